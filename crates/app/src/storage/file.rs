//! File-backed storage.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{KeyValueStore, StorageError};

/// A [`KeyValueStore`] persisting each key as `<key>.json` in a directory.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a reader never observes a partially written blob.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StorageError::unavailable(key, error)),
        }
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");

        fs::create_dir_all(&self.root)
            .await
            .map_err(|error| StorageError::unavailable(key, error))?;

        fs::write(&staging, value)
            .await
            .map_err(|error| StorageError::unavailable(key, error))?;

        fs::rename(&staging, &path)
            .await
            .map_err(|error| StorageError::unavailable(key, error))?;

        debug!(key, path = %path.display(), "wrote storage file");

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StorageError::unavailable(key, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_absent() -> TestResult {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());

        assert_eq!(store.read("cart").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn write_creates_directory_and_file() -> TestResult {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path().join("nested"));

        store.write("cart", b"[1]".to_vec()).await?;

        assert_eq!(store.read("cart").await?, Some(b"[1]".to_vec()));
        assert!(dir.path().join("nested/cart.json").exists());
        assert!(
            !dir.path().join("nested/cart.json.tmp").exists(),
            "staging file must be renamed away"
        );

        Ok(())
    }

    #[tokio::test]
    async fn overwrite_replaces_contents() -> TestResult {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());

        store.write("favorites", b"[\"a\"]".to_vec()).await?;
        store.write("favorites", b"[]".to_vec()).await?;

        assert_eq!(store.read("favorites").await?, Some(b"[]".to_vec()));

        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_file_succeeds() -> TestResult {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());

        store.delete("cart").await?;

        Ok(())
    }

    #[tokio::test]
    async fn data_survives_new_store_instance() -> TestResult {
        let dir = TempDir::new()?;

        FileStore::new(dir.path())
            .write("cart", b"[]".to_vec())
            .await?;

        let reopened = FileStore::new(dir.path());

        assert_eq!(reopened.read("cart").await?, Some(b"[]".to_vec()));

        Ok(())
    }

    #[tokio::test]
    async fn path_traversal_key_is_rejected() -> TestResult {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());

        let result = store.read("../etc/passwd").await;

        assert!(
            matches!(result, Err(StorageError::InvalidKey(_))),
            "expected InvalidKey, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unreadable_root_reports_unavailable() -> TestResult {
        let dir = TempDir::new()?;
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory")?;

        let store = FileStore::new(&blocker);

        let result = store.write("cart", b"[]".to_vec()).await;

        assert!(
            matches!(result, Err(StorageError::Unavailable { .. })),
            "expected Unavailable, got {result:?}"
        );

        Ok(())
    }
}
