//! Local Storage Config

use std::path::PathBuf;

use clap::Args;

/// Where the cart snapshot is kept between sessions.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory holding one file per storage key
    #[arg(long, env = "STOREFRONT_STORAGE_DIR", default_value = ".storefront")]
    pub storage_dir: PathBuf,
}
