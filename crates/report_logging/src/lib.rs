#![deny(missing_docs)]
//! Shared logging utilities for the Reportobello demo workspace.
//!
//! This crate provides the `report_*` logging macros used across the codebase,
//! a helper for keeping credentials out of log lines, and a minimal test
//! initializer for the global logger.

use std::sync::Once;

use simplelog::{ColorChoice, TermLogger, TerminalMode};

/// Number of trailing characters of a secret that survive redaction.
const VISIBLE_SUFFIX: usize = 4;

/// Masks a secret (such as an API key) for logging.
///
/// Only the last few characters are kept, and short secrets are masked entirely.
pub fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= VISIBLE_SUFFIX * 2 {
        return "*".repeat(chars.len().max(1));
    }
    let suffix: String = chars[chars.len() - VISIBLE_SUFFIX..].iter().collect();
    format!("****{suffix}")
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! report_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! report_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! report_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! report_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! report_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

static TEST_LOGGER: Once = Once::new();

/// Installs a stderr logger for tests, once per process.
///
/// The level comes from `REPORT_TEST_LOG` (`trace` through `off`) and defaults
/// to `warn` so passing runs stay quiet.
pub fn initialize_for_tests() {
    TEST_LOGGER.call_once(|| {
        let level = std::env::var("REPORT_TEST_LOG")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(log::LevelFilter::Warn);
        let _ = TermLogger::init(
            level,
            simplelog::Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Never,
        );
    });
}
