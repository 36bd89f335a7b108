//! Catalog client errors.

use bookshelf::books::BookId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unreachable")]
    Unreachable(#[from] reqwest::Error),

    #[error("book {0} not found")]
    NotFound(BookId),

    #[error("unexpected response from catalog: {0}")]
    UnexpectedResponse(String),
}

impl CatalogError {
    /// Whether the failure means the item does not exist, as opposed to the
    /// catalog being unavailable.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
