//! The browser UI, compiled into the binary.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// `GET /`: the file manager page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
