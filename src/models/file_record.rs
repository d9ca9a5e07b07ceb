//! The UI-facing projection of a stored object, plus the JSON envelopes the
//! file endpoints return.

use crate::models::object::StoredObject;
use chrono::SecondsFormat;
use serde::Serialize;

/// One row in the file list.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// The object key.
    pub name: String,

    /// Size in bytes.
    pub size: u64,

    /// ISO-8601 UTC with millisecond precision, e.g. `2025-01-02T03:04:05.678Z`.
    pub last_modified: String,

    /// Publicly resolvable URL of the object.
    pub url: String,
}

impl FileRecord {
    /// Project a stored object, resolving its URL under `public_url`.
    pub fn from_object(object: &StoredObject, public_url: &str) -> Self {
        Self {
            name: object.key.clone(),
            size: object.size_bytes,
            last_modified: object
                .last_modified
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            url: public_object_url(public_url, &object.key),
        }
    }
}

/// `{base}/{key}` with trailing slashes on `base` collapsed. The key is used as-is.
pub fn public_object_url(public_url: &str, key: &str) -> String {
    format!("{}/{}", public_url.trim_end_matches('/'), key)
}

/// Body of a successful `GET /api/files`.
#[derive(Serialize, Debug)]
pub struct ListFilesResponse {
    pub files: Vec<FileRecord>,
}

/// Body of a successful upload or delete.
#[derive(Serialize, Debug)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
