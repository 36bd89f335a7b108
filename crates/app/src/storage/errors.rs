//! Storage errors.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable for key {key:?}")]
    Unavailable {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

impl StorageError {
    pub(crate) fn unavailable(key: &str, source: io::Error) -> Self {
        Self::Unavailable {
            key: key.to_string(),
            source,
        }
    }
}
