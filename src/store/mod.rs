//! Object store abstraction.
//!
//! Templates live in an object store addressed by `(bucket, key)`. The
//! [`ObjectStore`] trait is the only thing the fetcher depends on, so the
//! S3 client and the in-memory store are interchangeable.

mod memory;
mod s3;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;
pub use s3::S3Store;

/// A fault raised by a store backend.
///
/// Mirrors what object-store clients report: a message and, usually, a
/// service error code such as `NoSuchKey` or `AccessDenied`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    pub code: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Read-only access to an object store.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single store is shared by every
/// request served through a fetcher.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full body of the object at `key` in `bucket`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on a missing key, access denial or transport
    /// failure. Implementations must not retry.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Backend type identifier, used in logs.
    fn backend_type(&self) -> &'static str;
}
