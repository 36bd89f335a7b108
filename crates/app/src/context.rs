//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    catalog::{CatalogClient, CatalogError, HttpCatalogClient},
    config::AppConfig,
    domain::{
        cart::{CartService, StoredCartService},
        favorites::{FavoritesService, StoredFavoritesService},
        invoice::{CartInvoiceService, InvoiceService},
    },
    storage::{FileStore, KeyValueStore},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build catalog client")]
    Catalog(#[source] CatalogError),
}

/// The services behind every command, constructed once per process.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogClient>,
    pub carts: Arc<dyn CartService>,
    pub favorites: Arc<dyn FavoritesService>,
    pub invoices: Arc<dyn InvoiceService>,
}

impl AppContext {
    /// Wire services over the given storage and catalog.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: Arc<dyn CatalogClient>) -> Self {
        let carts: Arc<dyn CartService> = Arc::new(StoredCartService::new(store.clone()));

        Self {
            favorites: Arc::new(StoredFavoritesService::new(store, catalog.clone())),
            invoices: Arc::new(CartInvoiceService::new(carts.clone())),
            carts,
            catalog,
        }
    }

    /// Build application context from configuration: file storage under the
    /// data directory and the HTTP catalog.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let catalog = HttpCatalogClient::new(config.catalog.client_config())
            .map_err(AppInitError::Catalog)?;

        Ok(Self::new(
            Arc::new(FileStore::new(&config.storage.data_dir)),
            Arc::new(catalog),
        ))
    }
}
