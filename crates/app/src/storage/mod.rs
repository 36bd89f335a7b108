//! Device key-value storage.

mod errors;
mod file;
mod memory;

pub use errors::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use mockall::automock;

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Storage key holding the serialized favorites.
pub const FAVORITES_KEY: &str = "favorites";

/// A namespaced, asynchronous blob store.
///
/// Operations on different keys are independent. Callers that read, modify
/// and write back a key are responsible for serializing those sequences.
#[automock]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the bytes stored under `key`, or `None` if it was never written.
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the bytes stored under `key`.
    async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Remove `key`. Removing a key that does not exist succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
