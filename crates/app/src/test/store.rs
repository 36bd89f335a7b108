//! Failure-injecting storage.

use std::{
    future, io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;

use crate::storage::{KeyValueStore, MemoryStore, StorageError};

#[derive(Debug, Default)]
struct Faults {
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
    hang_writes: AtomicBool,
    interleave: AtomicBool,
}

/// A [`MemoryStore`] whose writes and deletes can be made to fail, hang or
/// yield to other tasks. Clones share data and fault switches.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    faults: Arc<Faults>,
}

impl FlakyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_writes(&self, on: bool) {
        self.faults.fail_writes.store(on, Ordering::SeqCst);
    }

    pub(crate) fn fail_deletes(&self, on: bool) {
        self.faults.fail_deletes.store(on, Ordering::SeqCst);
    }

    /// Make writes never complete.
    pub(crate) fn hang_writes(&self, on: bool) {
        self.faults.hang_writes.store(on, Ordering::SeqCst);
    }

    /// Yield to the scheduler inside every read and write, so unserialized
    /// read-modify-write sequences would interleave.
    pub(crate) fn interleave(&self, on: bool) {
        self.faults.interleave.store(on, Ordering::SeqCst);
    }

    async fn pause(&self) {
        if self.faults.interleave.load(Ordering::SeqCst) {
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.pause().await;

        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        if self.faults.hang_writes.load(Ordering::SeqCst) {
            future::pending::<()>().await;
        }

        self.pause().await;

        if self.faults.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(key, io::Error::other("injected write failure")));
        }

        self.inner.write(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.faults.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(key, io::Error::other("injected delete failure")));
        }

        self.inner.delete(key).await
    }
}
