//! Remote book catalog.

pub mod client;
mod errors;

pub use client::{HttpCatalogConfig, HttpCatalogClient};
pub use errors::CatalogError;

use async_trait::async_trait;
use bookshelf::{books::BookId, catalog::Book};
use mockall::automock;

/// Read-only access to the remote book catalog.
#[automock]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch every book in the catalog.
    async fn list_books(&self) -> Result<Vec<Book>, CatalogError>;

    /// Fetch a single book.
    async fn get_book(&self, id: &BookId) -> Result<Book, CatalogError>;
}
