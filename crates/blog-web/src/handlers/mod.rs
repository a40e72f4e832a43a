//! HTTP handlers
//!
//! Each page handler collects its data through a `blog-service` service
//! and renders one template with the viewer added to the context.

pub mod auth;
pub mod health;
pub mod posts;

use axum::{http::Uri, response::Html};
use minijinja::{context, Value};

use crate::extractors::MaybeUser;
use crate::response::{WebError, WebResult};
use crate::templates;

/// Render a page template for `user`
pub(crate) fn render_page(name: &str, user: &MaybeUser, ctx: Value) -> WebResult<Html<String>> {
    let body = templates::render(name, context! { user => &user.0, ..ctx })?;
    Ok(Html(body))
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> WebError {
    WebError::NotFound(uri.path().to_string())
}
