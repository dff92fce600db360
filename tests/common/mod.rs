//! Shared harness for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use bulge_deeplink::analytics::RecordingSink;
use bulge_deeplink::auth::StaticAuth;
use bulge_deeplink::link::Params;
use bulge_deeplink::navigation::RecordingNavigator;
use bulge_deeplink::storage::{MemoryStorage, Storage, StorageError, StorageResult};
use bulge_deeplink::{Collaborators, DeepLinkConfig, DispatchCoordinator};

/// Coordinator wired to recording collaborators.
pub struct Harness {
    pub coordinator: DispatchCoordinator,
    pub navigator: Arc<RecordingNavigator>,
    pub storage: MemoryStorage,
    pub analytics: Arc<RecordingSink>,
    pub auth: Arc<StaticAuth>,
}

impl Harness {
    /// Collaborators sharing this harness's recorders, for building a second
    /// coordinator or feeding `bootstrap`.
    #[allow(dead_code)]
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            navigator: self.navigator.clone(),
            storage: Arc::new(self.storage.clone()),
            analytics: self.analytics.clone(),
            auth: self.auth.clone(),
        }
    }
}

pub fn harness(ready: bool, authenticated: bool) -> Harness {
    let storage = MemoryStorage::new();
    build(ready, authenticated, storage.clone(), Arc::new(storage))
}

/// Harness whose coordinator sees a storage backend that always fails.
#[allow(dead_code)]
pub fn harness_with_broken_storage(ready: bool, authenticated: bool) -> Harness {
    build(ready, authenticated, MemoryStorage::new(), Arc::new(FailingStorage))
}

fn build(
    ready: bool,
    authenticated: bool,
    storage: MemoryStorage,
    backend: Arc<dyn Storage>,
) -> Harness {
    let navigator = Arc::new(if ready {
        RecordingNavigator::ready()
    } else {
        RecordingNavigator::not_ready()
    });
    let analytics = Arc::new(RecordingSink::new());
    let auth = Arc::new(StaticAuth::new(authenticated));

    let collaborators = Collaborators {
        navigator: navigator.clone(),
        storage: backend,
        analytics: analytics.clone(),
        auth: auth.clone(),
    };
    let coordinator = DispatchCoordinator::new(&DeepLinkConfig::default(), collaborators);

    Harness {
        coordinator,
        navigator,
        storage,
        analytics,
        auth,
    }
}

/// Storage backend that rejects every operation.
#[allow(dead_code)]
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("disk full".into()))
    }

    async fn set(&self, _key: &str, _value: String) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk full".into()))
    }

    async fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk full".into()))
    }
}

pub fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
