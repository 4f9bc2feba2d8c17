use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use super::logging::{LogDestination, DEFAULT_LOG_FILE};

/// Terminal front end for building Reportobello reports.
#[derive(Debug, Parser)]
#[command(name = "reportobello_demo", version)]
pub(crate) struct Cli {
    /// RON configuration file; missing means defaults.
    #[arg(long, default_value = "reportobello.ron")]
    pub config: PathBuf,

    /// Where log records go.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log file used by `--log file` and `--log both`.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Also log request-level detail.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}
