//! Application configuration

use clap::{Args, ValueEnum};

use crate::config::{catalog::CatalogConfig, storage::StorageConfig};

pub mod catalog;
pub mod storage;

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Local storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Remote catalog settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Where diagnostics go and how they look. Logs are written to stderr so
/// command output on stdout stays clean.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `warn` or `bookshelf_app=debug`
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Output format
    #[arg(
        long,
        global = true,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact
    )]
    pub log_format: LogFormat,
}

/// Log line encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One human-readable line per event.
    Compact,

    /// One JSON object per event.
    Json,
}
