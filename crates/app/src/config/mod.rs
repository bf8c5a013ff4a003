//! Application configuration

use clap::Args;

use crate::config::{backend::BackendConfig, observability::LoggingConfig, storage::StorageConfig};

pub mod backend;
pub mod checkout;
pub mod observability;
pub mod storage;

/// Settings shared by every storefront command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Local cart storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Backend persistence settings.
    #[command(flatten)]
    pub backend: BackendConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
