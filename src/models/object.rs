//! Represents an object (file) stored in the bucket.

use chrono::{DateTime, Utc};

/// A single object as the provider reports it.
///
/// The provider owns all of this metadata; nothing here is persisted locally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key (path-like identifier within the bucket).
    pub key: String,

    /// Size in bytes.
    pub size_bytes: u64,

    /// Timestamp when the object was last written.
    pub last_modified: DateTime<Utc>,
}
