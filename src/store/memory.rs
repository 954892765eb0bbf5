//! In-memory object store using DashMap.
//!
//! Objects are held in memory only. Useful for tests and for running the
//! fetcher against fixtures without network access.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{ObjectStore, StoreError};

/// In-memory object store keyed by `(bucket, key)`.
#[derive(Default)]
pub struct MemoryStore {
    objects: DashMap<(String, String), Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an object, replacing any previous body at the same location.
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.objects
            .insert((bucket.to_string(), key.to_string()), body.into());
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|body| body.value().clone())
            .ok_or_else(|| {
                tracing::debug!(bucket = %bucket, key = %key, "Object not found in memory store");
                StoreError::new("The specified key does not exist.").with_code("NoSuchKey")
            })
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}
