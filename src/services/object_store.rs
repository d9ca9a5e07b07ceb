//! The storage binding seam.
//!
//! Everything the service needs from the object-storage provider is expressed
//! by [`ObjectStore`]: one page of listing, a put and a delete. Implementations
//! live in `s3_store` (the real provider) and `memory_store` (process-local).

use crate::models::object::StoredObject;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("provider request failed: {0}")]
    Provider(String),
    #[error("invalid object key `{0}`")]
    InvalidKey(String),
    #[error("storage binding misconfigured: {0}")]
    Config(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// One page of a bucket listing, in provider order.
#[derive(Debug, Default)]
pub struct ListPage {
    pub objects: Vec<StoredObject>,
    /// Present when the provider truncated the listing.
    pub next_continuation_token: Option<String>,
}

/// A payload ready to be written under a key.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name used in logs and readiness output.
    fn describe(&self) -> String;

    /// Fetch a single listing page, starting after `continuation_token`.
    async fn list_page(&self, continuation_token: Option<String>) -> StorageResult<ListPage>;

    /// Write an object. Replaces any object already stored under the key.
    async fn put_object(&self, object: PutObject) -> StorageResult<()>;

    /// Remove an object. Removing a missing key is not an error.
    async fn delete_object(&self, key: &str) -> StorageResult<()>;

    /// Cheap round-trip that proves the bucket is reachable.
    async fn check_ready(&self) -> StorageResult<()>;
}

/// Reject keys no provider would accept.
pub fn ensure_key_valid(key: &str) -> StorageResult<()> {
    const MAX_OBJECT_KEY_LEN: usize = 1024;

    if key.is_empty() || key.len() > MAX_OBJECT_KEY_LEN {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    if key.bytes().any(|b| b == b'\0') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
