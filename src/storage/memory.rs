//! Process-local storage backend.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Storage, StorageResult};

/// In-memory store; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<DashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Direct read without going through the async contract.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.inner.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key);
        Ok(())
    }
}
