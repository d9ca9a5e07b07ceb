//! Core data models for the file manager.
//!
//! `StoredObject` is what the provider reports, `FileRecord` is what the UI
//! sees, and `UploadKey` names new objects.

pub mod file_record;
pub mod object;
pub mod upload_key;
