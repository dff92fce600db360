//! Persistent key-value storage contract.
//!
//! # Data Flow
//! ```text
//! auth gate / attribution recorder
//!     → read_json / write_json (serde_json encoding)
//!     → Storage::get / set / remove (opaque string blobs)
//!     → memory.rs (process-local) | file.rs (JSON document on disk)
//! ```
//!
//! # Design Decisions
//! - Every operation is fallible and returns `StorageResult`
//! - Callers decide whether a failure is ignorable; for link handling it
//!   always is (read failure = absent, write failure = skipped)
//! - Values are opaque strings; structure lives in the caller's types

pub mod file;
pub mod memory;

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file or device failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be encoded or decoded.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend refused or is unreachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value store of opaque string blobs.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> StorageResult<()>;

    async fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Load and decode a JSON value.
pub async fn read_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> StorageResult<Option<T>> {
    match storage.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and store a JSON value.
pub async fn write_json<T: Serialize + Sync>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, raw).await
}

/// Wall-clock milliseconds since the Unix epoch, used to stamp persisted records.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let storage = MemoryStorage::new();
        let record = Record {
            name: "a".to_string(),
            count: 3,
        };

        assert!(read_json::<Record>(&storage, "k").await.unwrap().is_none());
        write_json(&storage, "k", &record).await.unwrap();
        assert_eq!(read_json::<Record>(&storage, "k").await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_serialization_error() {
        let storage = MemoryStorage::new();
        storage.set("k", "{not json".to_string()).await.unwrap();
        let err = read_json::<Record>(&storage, "k").await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn test_now_millis_reads_wall_clock() {
        // 2020-01-01T00:00:00Z
        assert!(now_millis() > 1_577_836_800_000);
    }
}
