//! HTTP handlers for the three file operations.
//!
//! Each handler is a thin pass-through to `StorageService`. Client mistakes get
//! a specific 400; anything the provider reports becomes a generic 500 with the
//! detail kept in the server log.

use crate::{
    errors::AppError,
    models::file_record::{ListFilesResponse, SuccessResponse},
    services::storage_service::{IncomingFile, StorageService},
};
use axum::{
    Json,
    extract::{
        Multipart, Query, State,
        multipart::MultipartRejection,
        rejection::QueryRejection,
    },
};
use serde::Deserialize;
use tracing::{debug, warn};

/// Multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

pub const NO_FILE_PROVIDED: &str = "No file provided";
pub const NO_FILE_SPECIFIED: &str = "No file specified";
pub const LIST_FAILED: &str = "Failed to list files";
pub const UPLOAD_FAILED: &str = "Failed to upload file";
pub const DELETE_FAILED: &str = "Failed to delete file";

/// Query string of `DELETE /api/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub file: Option<String>,
}

/// `GET /api/files`: every object in the bucket as a file record.
pub async fn list_files(
    State(service): State<StorageService>,
) -> Result<Json<ListFilesResponse>, AppError> {
    let files = service
        .list_files()
        .await
        .map_err(|err| AppError::provider(LIST_FAILED, err))?;

    Ok(Json(ListFilesResponse { files }))
}

/// `POST /api/upload`: store the multipart `file` field under a fresh key.
pub async fn upload_file(
    State(service): State<StorageService>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!("upload without a multipart body: {}", rejection);
        AppError::bad_request(NO_FILE_PROVIDED)
    })?;

    let file = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::bad_request(NO_FILE_PROVIDED))?;

    service
        .upload_file(file)
        .await
        .map_err(|err| AppError::provider(UPLOAD_FAILED, err))?;

    Ok(Json(SuccessResponse::ok()))
}

/// `DELETE /api/delete?file=<key>`: remove one object by exact key.
pub async fn delete_file(
    State(service): State<StorageService>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| {
        warn!("delete with an unreadable query string: {}", rejection);
        AppError::bad_request(NO_FILE_SPECIFIED)
    })?;

    let key = query
        .file
        .filter(|key| !key.is_empty())
        .ok_or_else(|| AppError::bad_request(NO_FILE_SPECIFIED))?;

    service
        .delete_file(&key)
        .await
        .map_err(|err| AppError::provider(DELETE_FAILED, err))?;

    Ok(Json(SuccessResponse::ok()))
}

/// Scan the form for the first `file` part that carries a filename and read it
/// fully into memory. Other parts are skipped.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<IncomingFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::multipart(UPLOAD_FAILED, err))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("skipping multipart field {:?}", field.name());
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            debug!("`file` field has no filename; not a file part");
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let body = field
            .bytes()
            .await
            .map_err(|err| AppError::multipart(UPLOAD_FAILED, err))?;

        return Ok(Some(IncomingFile {
            filename,
            content_type,
            body,
        }));
    }

    Ok(None)
}
