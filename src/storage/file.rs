//! JSON-file storage backend.
//!
//! The whole key space is one JSON object on disk, rewritten on every
//! mutation so a crash never loses an acknowledged write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Storage, StorageResult};

#[derive(Debug, Clone)]
pub struct FileStorage {
    inner: Arc<DashMap<String, String>>,
    path: PathBuf,
}

impl FileStorage {
    /// Open a store, loading the file if it exists.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = DashMap::new();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if !content.trim().is_empty() {
                let map: BTreeMap<String, String> = serde_json::from_str(&content)?;
                for (k, v) in map {
                    inner.insert(k, v);
                }
            }
            tracing::debug!(path = %path.display(), keys = inner.len(), "Loaded link state file");
        }

        Ok(Self {
            inner: Arc::new(inner),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self) -> StorageResult<()> {
        let map: BTreeMap<_, _> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        let bytes = serde_json::to_vec_pretty(&map)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.inner.get(key).map(|r| r.value().clone()))
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.inner.insert(key.to_string(), value);
        self.flush().await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        if self.inner.remove(key).is_some() {
            self.flush().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("deeplink-state-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_persistence() {
        let path = temp_path();

        let storage = FileStorage::open(&path).unwrap();
        storage.set("@referral_data", "{\"referrer\":\"u1\"}".to_string()).await.unwrap();
        storage.set("other", "x".to_string()).await.unwrap();
        storage.remove("other").await.unwrap();

        // Load new instance
        let loaded = FileStorage::open(&path).unwrap();
        assert_eq!(
            loaded.get("@referral_data").await.unwrap().as_deref(),
            Some("{\"referrer\":\"u1\"}")
        );
        assert!(loaded.get("other").await.unwrap().is_none());

        // Cleanup
        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let storage = FileStorage::open(temp_path()).unwrap();
        assert!(storage.get("anything").await.unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let path = temp_path();
        std::fs::write(&path, "[1, 2").unwrap();
        let err = FileStorage::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_unwritable_path_surfaces_io_error() {
        let storage = FileStorage::open("/nonexistent-dir/deeplink/state.json").unwrap();
        let err = storage.set("k", "v".to_string()).await.unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
