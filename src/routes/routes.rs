//! Defines routes for the file manager.
//!
//! ## Structure
//! - **UI**
//!   - `GET    /`: the file manager page
//!
//! - **File endpoints**
//!   - `GET    /api/files`: list every object as a file record
//!   - `POST   /api/upload`: multipart upload, field `file`
//!   - `DELETE /api/delete?file=<key>`: delete one object
//!
//! - **Health**
//!   - `GET    /healthz`, `GET /readyz`

use crate::{
    handlers::{
        file_handlers::{delete_file, list_files, upload_file},
        health_handlers::{healthz, readyz},
        ui_handlers::index,
    },
    services::storage_service::StorageService,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

/// Build and return the router for the UI, file endpoints and health checks.
///
/// The router carries shared state (`StorageService`) to all handlers. Upload
/// bodies above `max_upload_bytes` are rejected with 413.
pub fn routes(max_upload_bytes: usize) -> Router<StorageService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/", get(index))
        .route("/api/files", get(list_files))
        .route(
            "/api/upload",
            post(upload_file).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/delete", delete(delete_file))
        .layer(TraceLayer::new_for_http())
}
