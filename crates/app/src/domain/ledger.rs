//! Serialized read-modify-write access to a single storage key.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::Arc,
};

use bookshelf::{cart::Cart, decode::Decoded, favorites::Favorites};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::storage::{KeyValueStore, StorageError};

/// A collection that lives under one storage key.
pub trait Stored: Clone + Default + Send + Sync + 'static {
    /// Decode stored bytes, recovering to the default on malformed input.
    fn decode(bytes: &[u8]) -> Decoded<Self>;

    /// Encode for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn encode(&self) -> Result<Vec<u8>, serde_json::Error>;
}

impl Stored for Cart {
    fn decode(bytes: &[u8]) -> Decoded<Self> {
        Cart::from_slice(bytes)
    }

    fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        self.to_vec()
    }
}

impl Stored for Favorites {
    fn decode(bytes: &[u8]) -> Decoded<Self> {
        Favorites::from_slice(bytes)
    }

    fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        self.to_vec()
    }
}

/// Count of committed mutations of one collection since the process started.
///
/// A result carrying an older revision than one already applied was
/// superseded and should be dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    /// Revision of a collection nothing has been committed to yet.
    pub const INITIAL: Revision = Revision(0);

    /// Raw counter value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Display for Revision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "r{}", self.0)
    }
}

/// A value tagged with the revision it was observed at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub revision: Revision,
}

/// The outcome of applying an edit to the current value.
pub(crate) enum Edit<R> {
    /// The value was modified and must be persisted.
    Changed(R),

    /// The value was left as is; nothing is written.
    Unchanged(R),
}

pub(crate) struct Committed<T, R> {
    pub value: T,
    pub output: R,
    pub revision: Revision,
}

enum Persist {
    Write(Vec<u8>),
    Delete,
}

struct LedgerState<T> {
    cached: Option<T>,
    revision: Revision,
}

/// Owner of the cached value stored under one key.
///
/// Every operation holds the state lock for its whole read-modify-write
/// sequence, so mutations are applied one at a time in the order they were
/// issued. The cache only takes a new value after the store confirms the
/// write. While a write is in flight the cache is empty, so an operation
/// dropped mid-write leaves the next caller reading from storage.
pub(crate) struct Ledger<T> {
    key: &'static str,
    store: Arc<dyn KeyValueStore>,
    state: Mutex<LedgerState<T>>,
}

impl<T: Stored> Ledger<T> {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            key,
            store,
            state: Mutex::new(LedgerState {
                cached: None,
                revision: Revision::INITIAL,
            }),
        }
    }

    pub(crate) async fn revision(&self) -> Revision {
        self.state.lock().await.revision
    }

    pub(crate) async fn load<E>(&self) -> Result<Versioned<T>, E>
    where
        E: From<StorageError>,
    {
        let mut state = self.state.lock().await;
        let value = self.current(&mut state).await?;

        Ok(Versioned {
            value,
            revision: state.revision,
        })
    }

    pub(crate) async fn update<R, E>(
        &self,
        apply: impl FnOnce(&mut T) -> Edit<R> + Send,
    ) -> Result<Committed<T, R>, E>
    where
        R: Send,
        E: From<StorageError> + From<serde_json::Error>,
    {
        let mut state = self.state.lock().await;
        let current = self.current(&mut state).await?;
        let mut next = current.clone();

        let output = match apply(&mut next) {
            Edit::Changed(output) => output,
            Edit::Unchanged(output) => {
                return Ok(Committed {
                    value: current,
                    output,
                    revision: state.revision,
                });
            }
        };

        let bytes = next.encode()?;
        let revision = self
            .persist(&mut state, next.clone(), Persist::Write(bytes))
            .await?;

        Ok(Committed {
            value: next,
            output,
            revision,
        })
    }

    pub(crate) async fn clear<E>(&self) -> Result<Revision, E>
    where
        E: From<StorageError>,
    {
        let mut state = self.state.lock().await;

        Ok(self.persist(&mut state, T::default(), Persist::Delete).await?)
    }

    /// Clear only if nothing was committed since `expected`. Returns `None`
    /// without touching storage otherwise.
    pub(crate) async fn clear_if<E>(&self, expected: Revision) -> Result<Option<Revision>, E>
    where
        E: From<StorageError>,
    {
        let mut state = self.state.lock().await;

        if state.revision != expected {
            debug!(key = self.key, %expected, current = %state.revision, "refusing stale clear");

            return Ok(None);
        }

        Ok(Some(
            self.persist(&mut state, T::default(), Persist::Delete)
                .await?,
        ))
    }

    async fn current(&self, state: &mut LedgerState<T>) -> Result<T, StorageError> {
        if let Some(value) = &state.cached {
            return Ok(value.clone());
        }

        let value = match self.store.read(self.key).await? {
            Some(bytes) => {
                let decoded = T::decode(&bytes);

                if decoded.recovered {
                    warn!(key = self.key, "stored value is malformed, starting empty");
                }

                for index in &decoded.skipped {
                    warn!(key = self.key, index, "dropped unreadable stored entry");
                }

                decoded.value
            }
            None => T::default(),
        };

        debug!(key = self.key, "loaded from storage");

        state.cached = Some(value.clone());

        Ok(value)
    }

    async fn persist(
        &self,
        state: &mut LedgerState<T>,
        next: T,
        op: Persist,
    ) -> Result<Revision, StorageError> {
        let previous = state.cached.take();

        let result = match op {
            Persist::Write(bytes) => self.store.write(self.key, bytes).await,
            Persist::Delete => self.store.delete(self.key).await,
        };

        match result {
            Ok(()) => {
                state.cached = Some(next);
                state.revision = state.revision.next();

                info!(key = self.key, revision = %state.revision, "committed");

                Ok(state.revision)
            }
            Err(err) => {
                state.cached = previous;

                error!(key = self.key, error = %err, "write failed, keeping previous value");

                Err(err)
            }
        }
    }
}
