//! S3ObjectStore: the binding to an S3-compatible provider.
//!
//! Built once at startup from [`AppConfig`]. Works against AWS S3 and against
//! providers reached through a custom endpoint (R2, MinIO, ...). Credentials
//! come from the config when both halves are set, otherwise from the AWS
//! default provider chain.

use crate::{
    config::AppConfig,
    models::object::StoredObject,
    services::object_store::{
        ListPage, ObjectStore, PutObject, StorageError, StorageResult, ensure_key_valid,
    },
};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    Client as S3Client,
    config::Region,
    error::{DisplayErrorContext, SdkError},
    primitives::{ByteStream, DateTime as SmithyDateTime},
    types::Object as S3Object,
};
use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Region used when a custom endpoint is set but no region is configured.
/// R2 and most S3-compatible providers accept it.
const FALLBACK_REGION: &str = "auto";

pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client from the resolved configuration.
    pub async fn connect(cfg: &AppConfig) -> StorageResult<Self> {
        let bucket = cfg
            .bucket
            .clone()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| StorageError::Config("bucket name is required".into()))?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        let region = cfg.region.clone().or_else(|| {
            cfg.endpoint
                .as_ref()
                .map(|_| FALLBACK_REGION.to_string())
        });
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }

        if let Some(endpoint) = &cfg.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&cfg.access_key_id, &cfg.secret_access_key)
        {
            let credentials = Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "bucket-manager",
            );
            loader = loader.credentials_provider(credentials);
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(cfg.force_path_style)
            .build();

        Ok(Self::from_client(S3Client::from_conf(s3_config), bucket))
    }

    /// Wrap an already configured client.
    pub fn from_client(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn describe(&self) -> String {
        format!("s3://{}", self.bucket)
    }

    async fn list_page(&self, continuation_token: Option<String>) -> StorageResult<ListPage> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .set_continuation_token(continuation_token)
            .send()
            .await
            .map_err(provider_error)?;

        let objects = response
            .contents()
            .iter()
            .filter_map(stored_object)
            .collect::<Vec<_>>();

        let next_continuation_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        debug!(
            "listed {} objects from {} (truncated: {})",
            objects.len(),
            self.bucket,
            next_continuation_token.is_some()
        );

        Ok(ListPage {
            objects,
            next_continuation_token,
        })
    }

    async fn put_object(&self, object: PutObject) -> StorageResult<()> {
        ensure_key_valid(&object.key)?;
        let content_md5 = general_purpose::STANDARD.encode(md5::compute(&object.body).0);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object.key)
            .content_type(&object.content_type)
            .content_length(object.body.len() as i64)
            .content_md5(content_md5)
            .body(ByteStream::from(object.body))
            .send()
            .await
            .map_err(provider_error)?;

        Ok(())
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(provider_error)?;

        Ok(())
    }

    async fn check_ready(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(provider_error)?;

        Ok(())
    }
}

fn provider_error<E, R>(err: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    StorageError::Provider(DisplayErrorContext(&err).to_string())
}

/// Entries without a key are skipped; a missing timestamp becomes the epoch.
fn stored_object(obj: &S3Object) -> Option<StoredObject> {
    let key = obj.key()?.to_string();
    Some(StoredObject {
        key,
        size_bytes: obj.size().unwrap_or(0).max(0) as u64,
        last_modified: obj
            .last_modified()
            .and_then(to_chrono)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    })
}

fn to_chrono(dt: &SmithyDateTime) -> Option<DateTime<Utc>> {
    dt.to_millis().ok().and_then(DateTime::<Utc>::from_timestamp_millis)
}
