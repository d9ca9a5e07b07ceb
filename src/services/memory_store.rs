//! MemoryObjectStore: a process-local bucket.
//!
//! Behaves like an S3 bucket for the three calls the service makes: keys are
//! listed in lexicographic order, listings are cut into pages of at most
//! `page_size` entries, and deleting a missing key succeeds. Contents vanish
//! with the process; this backend exists for local development and tests.

use crate::{
    models::object::StoredObject,
    services::object_store::{
        ListPage, ObjectStore, PutObject, StorageResult, ensure_key_valid,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, ops::Bound, sync::Arc};
use tokio::sync::RwLock;
use tracing::debug;

/// S3's ListObjectsV2 default `max-keys`.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Clone, Debug)]
struct MemoryObject {
    object: PutObject,
    last_modified: DateTime<Utc>,
}

#[derive(Clone)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<BTreeMap<String, MemoryObject>>>,
    page_size: usize,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// A store that truncates listings after `page_size` keys.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            objects: Arc::new(RwLock::new(BTreeMap::new())),
            page_size: page_size.max(1),
        }
    }
}

#[cfg(test)]
impl MemoryObjectStore {
    /// Stored body for `key`, if any.
    pub async fn body(&self, key: &str) -> Option<bytes::Bytes> {
        self.objects.read().await.get(key).map(|o| o.object.body.clone())
    }

    /// Stored content type for `key`, if any.
    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|o| o.object.content_type.clone())
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn list_page(&self, continuation_token: Option<String>) -> StorageResult<ListPage> {
        let objects = self.objects.read().await;
        let lower = match continuation_token {
            Some(token) => Bound::Excluded(token),
            None => Bound::Unbounded,
        };

        let mut page: Vec<StoredObject> = objects
            .range((lower, Bound::Unbounded))
            .take(self.page_size + 1)
            .map(|(key, obj)| StoredObject {
                key: key.clone(),
                size_bytes: obj.object.body.len() as u64,
                last_modified: obj.last_modified,
            })
            .collect();

        let mut next_continuation_token = None;
        if page.len() > self.page_size {
            page.truncate(self.page_size);
            next_continuation_token = page.last().map(|o| o.key.clone());
        }

        Ok(ListPage {
            objects: page,
            next_continuation_token,
        })
    }

    async fn put_object(&self, object: PutObject) -> StorageResult<()> {
        ensure_key_valid(&object.key)?;
        let key = object.key.clone();
        let entry = MemoryObject {
            object,
            last_modified: Utc::now(),
        };
        self.objects.write().await.insert(key, entry);
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        if self.objects.write().await.remove(key).is_none() {
            debug!("delete of missing key {} treated as success", key);
        }
        Ok(())
    }

    async fn check_ready(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn put(key: &str, body: &'static [u8]) -> PutObject {
        PutObject {
            key: key.to_string(),
            body: Bytes::from_static(body),
            content_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn lists_in_key_order_with_metadata() {
        let store = MemoryObjectStore::new();
        store.put_object(put("b.png", b"bb")).await.unwrap();
        store.put_object(put("a.png", b"a")).await.unwrap();

        let page = store.list_page(None).await.unwrap();
        let keys: Vec<_> = page.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["a.png", "b.png"]);
        assert_eq!(page.objects[1].size_bytes, 2);
        assert_eq!(store.content_type("a.png").await.as_deref(), Some("image/png"));
        assert!(page.next_continuation_token.is_none());
    }

    #[tokio::test]
    async fn truncates_and_resumes_after_token() {
        let store = MemoryObjectStore::with_page_size(2);
        for key in ["k1", "k2", "k3"] {
            store.put_object(put(key, b"x")).await.unwrap();
        }

        let first = store.list_page(None).await.unwrap();
        assert_eq!(first.objects.len(), 2);
        assert_eq!(first.next_continuation_token.as_deref(), Some("k2"));

        let second = store
            .list_page(first.next_continuation_token)
            .await
            .unwrap();
        assert_eq!(second.objects.len(), 1);
        assert_eq!(second.objects[0].key, "k3");
        assert!(second.next_continuation_token.is_none());
    }

    #[tokio::test]
    async fn exact_page_is_not_truncated() {
        let store = MemoryObjectStore::with_page_size(2);
        store.put_object(put("k1", b"x")).await.unwrap();
        store.put_object(put("k2", b"x")).await.unwrap();

        let page = store.list_page(None).await.unwrap();
        assert_eq!(page.objects.len(), 2);
        assert!(page.next_continuation_token.is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryObjectStore::new();
        store.put_object(put("gone.png", b"x")).await.unwrap();

        store.delete_object("gone.png").await.unwrap();
        store.delete_object("gone.png").await.unwrap();
        store.delete_object("never-existed.png").await.unwrap();
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn put_replaces_existing_body() {
        let store = MemoryObjectStore::new();
        store.put_object(put("same", b"one")).await.unwrap();
        store.put_object(put("same", b"three")).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.body("same").await.unwrap(), Bytes::from_static(b"three"));
    }

    #[tokio::test]
    async fn rejects_empty_key() {
        let store = MemoryObjectStore::new();
        assert!(store.put_object(put("", b"x")).await.is_err());
    }
}
