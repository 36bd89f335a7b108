//! Catalog Config

use std::time::Duration;

use clap::Args;

use crate::catalog::{HttpCatalogConfig, client::DEFAULT_CATALOG_URL};

/// Remote catalog settings.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Catalog service base URL
    #[arg(long, global = true, env = "BOOKSHELF_API_URL", default_value = DEFAULT_CATALOG_URL)]
    pub api_url: String,

    /// Catalog request timeout in seconds.
    #[arg(
        long,
        global = true,
        env = "BOOKSHELF_API_TIMEOUT_SECONDS",
        default_value_t = 10u64
    )]
    pub api_timeout_seconds: u64,
}

impl CatalogConfig {
    /// Settings for the HTTP catalog client.
    #[must_use]
    pub fn client_config(&self) -> HttpCatalogConfig {
        HttpCatalogConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.api_timeout_seconds),
        }
    }
}
