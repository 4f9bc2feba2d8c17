//! Logger setup for the demo binary.
//!
//! The page is printed on stdout, so terminal records go to stderr and the
//! default destination is a log file next to the working directory.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub(crate) const DEFAULT_LOG_FILE: &str = "reportobello_demo.log";

/// Where log records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    File,
    Terminal,
    Both,
}

impl LogDestination {
    fn to_terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

/// Installs the global logger. Failing to open `file` only costs the file sink.
pub fn initialize(destination: LogDestination, level: LevelFilter, file: &Path) {
    let config = record_format();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.to_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination.to_file() {
        match File::create(file) {
            Ok(handle) => loggers.push(WriteLogger::new(level, config, handle)),
            Err(err) => eprintln!("Warning: could not create log file {}: {err}", file.display()),
        }
    }

    if loggers.is_empty() {
        return;
    }
    if CombinedLogger::init(loggers).is_err() {
        eprintln!("Warning: a logger is already installed");
    }
}

fn record_format() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // reqwest internals are noisy at debug.
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("rustls")
        .build()
}
