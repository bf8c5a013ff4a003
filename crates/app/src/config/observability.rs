//! Logging Config

use clap::{Args, ValueEnum};

/// How log lines are rendered on stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One line per event, for a terminal.
    Compact,

    /// One JSON object per event, for log shippers.
    Json,
}

/// Logging flags for the storefront CLI.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Default filter directive for storefront logs; `RUST_LOG` takes precedence when set
    #[arg(short, long, env = "STOREFRONT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Render logs as compact text or JSON
    #[arg(long, env = "STOREFRONT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
