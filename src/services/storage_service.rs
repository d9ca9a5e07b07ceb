//! src/services/storage_service.rs
//!
//! StorageService: the three file-manager operations expressed against an
//! [`ObjectStore`]. Handlers call into this; it owns key generation, URL
//! resolution and the single-page/all-pages listing choice. Nothing here holds
//! state across requests besides the shared binding.

use crate::{
    models::{file_record::FileRecord, upload_key::UploadKey},
    services::object_store::{ObjectStore, PutObject, StorageResult},
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info};

/// Fallback when a multipart part declares no content type.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file received from a client, not yet stored.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct StorageService {
    /// The configured storage binding.
    pub store: Arc<dyn ObjectStore>,

    /// Base URL objects are publicly served from.
    pub public_url: String,

    /// Follow continuation tokens when listing instead of stopping at the
    /// provider's first page.
    pub list_all_pages: bool,
}

impl StorageService {
    pub fn new(store: Arc<dyn ObjectStore>, public_url: impl Into<String>) -> Self {
        Self {
            store,
            public_url: public_url.into(),
            list_all_pages: false,
        }
    }

    pub fn with_list_all_pages(mut self, list_all_pages: bool) -> Self {
        self.list_all_pages = list_all_pages;
        self
    }

    /// Every object in the bucket as a [`FileRecord`].
    ///
    /// Unless `list_all_pages` is set this is one provider call, so buckets
    /// larger than a page come back truncated.
    pub async fn list_files(&self) -> StorageResult<Vec<FileRecord>> {
        let mut page = self.store.list_page(None).await?;
        let mut files: Vec<FileRecord> = page
            .objects
            .iter()
            .map(|obj| FileRecord::from_object(obj, &self.public_url))
            .collect();

        if !self.list_all_pages {
            if page.next_continuation_token.is_some() {
                debug!(
                    "listing of {} truncated at {} entries",
                    self.store.describe(),
                    files.len()
                );
            }
            return Ok(files);
        }

        while let Some(token) = page.next_continuation_token.take() {
            page = self.store.list_page(Some(token)).await?;
            files.extend(
                page.objects
                    .iter()
                    .map(|obj| FileRecord::from_object(obj, &self.public_url)),
            );
        }

        Ok(files)
    }

    /// Store `file` under a fresh [`UploadKey`] and return that key.
    pub async fn upload_file(&self, file: IncomingFile) -> StorageResult<UploadKey> {
        let key = UploadKey::now(&file.filename);
        let size = file.body.len();
        let content_type = file
            .content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        self.store
            .put_object(PutObject {
                key: key.as_str().to_string(),
                body: file.body,
                content_type,
            })
            .await?;

        info!("stored {} ({} bytes) in {}", key, size, self.store.describe());
        Ok(key)
    }

    /// Remove `key`. Missing keys are not an error.
    pub async fn delete_file(&self, key: &str) -> StorageResult<()> {
        self.store.delete_object(key).await?;
        info!("deleted {} from {}", key, self.store.describe());
        Ok(())
    }

    /// Readiness of the underlying binding.
    pub async fn check_ready(&self) -> StorageResult<()> {
        self.store.check_ready().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory_store::MemoryObjectStore;

    fn incoming(name: &str, body: &'static [u8], ct: Option<&str>) -> IncomingFile {
        IncomingFile {
            filename: name.to_string(),
            content_type: ct.map(str::to_string),
            body: Bytes::from_static(body),
        }
    }

    fn service(store: &MemoryObjectStore) -> StorageService {
        StorageService::new(Arc::new(store.clone()), "https://pub.example.com/")
    }

    #[tokio::test]
    async fn upload_then_list_shows_generated_key() {
        let store = MemoryObjectStore::new();
        let svc = service(&store);

        let key = svc
            .upload_file(incoming("cat.png", b"\x89PNG", Some("image/png")))
            .await
            .unwrap();
        assert!(key.as_str().ends_with("-cat.png"));

        let files = svc.list_files().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, key.as_str());
        assert_eq!(files[0].size, 4);
        assert_eq!(
            files[0].url,
            format!("https://pub.example.com/{}", key.as_str())
        );
        assert_eq!(
            store.content_type(key.as_str()).await.as_deref(),
            Some("image/png")
        );
    }

    #[tokio::test]
    async fn missing_content_type_defaults_to_octet_stream() {
        let store = MemoryObjectStore::new();
        let svc = service(&store);

        let key = svc.upload_file(incoming("blob", b"x", None)).await.unwrap();
        assert_eq!(
            store.content_type(key.as_str()).await.as_deref(),
            Some(DEFAULT_CONTENT_TYPE)
        );
    }

    #[tokio::test]
    async fn delete_then_list_excludes_key() {
        let store = MemoryObjectStore::new();
        let svc = service(&store);
        let key = svc
            .upload_file(incoming("dog.jpg", b"jpg", Some("image/jpeg")))
            .await
            .unwrap();

        svc.delete_file(key.as_str()).await.unwrap();
        assert!(svc.list_files().await.unwrap().is_empty());

        // again, and for a key that never existed
        svc.delete_file(key.as_str()).await.unwrap();
        svc.delete_file("never-uploaded.png").await.unwrap();
    }

    #[tokio::test]
    async fn single_page_listing_truncates() {
        let store = MemoryObjectStore::with_page_size(2);
        for name in ["a", "b", "c", "d", "e"] {
            store
                .put_object(PutObject {
                    key: name.to_string(),
                    body: Bytes::from_static(b"x"),
                    content_type: "text/plain".to_string(),
                })
                .await
                .unwrap();
        }

        let svc = service(&store);
        assert_eq!(svc.list_files().await.unwrap().len(), 2);

        let svc = svc.with_list_all_pages(true);
        let names: Vec<_> = svc
            .list_files()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["a", "b", "c", "d", "e"]);
    }
}
