//! Favorites service errors.

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum FavoritesServiceError {
    #[error("favorites storage failed")]
    Storage(#[from] StorageError),

    #[error("failed to encode favorites")]
    Encode(#[from] serde_json::Error),
}
