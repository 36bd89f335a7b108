//! Cart service errors.

use thiserror::Error;

use crate::{domain::ledger::Revision, storage::StorageError};

#[derive(Debug, Error)]
pub enum CartServiceError {
    #[error("cart storage failed")]
    Storage(#[from] StorageError),

    #[error("failed to encode cart")]
    Encode(#[from] serde_json::Error),

    #[error("cart changed since revision {expected}")]
    Stale { expected: Revision },
}
