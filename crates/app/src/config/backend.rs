//! Backend Config

use clap::Args;

use crate::{domain::orders::ORDERS_COLLECTION, persistence::RestConfig};

/// Backend persistence settings.
#[derive(Debug, Args)]
pub struct BackendConfig {
    /// Backend base URL
    #[arg(
        long,
        env = "STOREFRONT_BACKEND_URL",
        default_value = "http://localhost:54321"
    )]
    pub backend_url: String,

    /// Backend API key
    #[arg(long, env = "STOREFRONT_BACKEND_KEY", hide_env_values = true)]
    pub backend_key: Option<String>,

    /// Collection orders are written to
    #[arg(long, env = "STOREFRONT_ORDERS_TABLE", default_value = ORDERS_COLLECTION)]
    pub orders_table: String,
}

impl BackendConfig {
    /// Connection settings for the REST client.
    #[must_use]
    pub fn rest_config(&self) -> RestConfig {
        RestConfig {
            base_url: self.backend_url.clone(),
            api_key: self.backend_key.clone(),
        }
    }
}
