//! Error pages and redirects
//!
//! Handlers return [`WebResult`]; failures become HTML error pages rendered
//! from the `core/` templates.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use blog_service::ServiceError;
use minijinja::context;
use thiserror::Error;
use tracing::{error, warn};

use crate::templates;

/// Web layer error type
#[derive(Debug, Error)]
pub enum WebError {
    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Unknown route or malformed identifier; carries the requested path
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request body too large")]
    PayloadTooLarge,
}

impl WebError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Service(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short code for logs
    pub fn error_code(&self) -> &str {
        match self {
            Self::Service(e) => e.error_code(),
            Self::Template(_) => "TEMPLATE_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
        }
    }

    fn page(&self, status: StatusCode) -> Result<String, minijinja::Error> {
        if status == StatusCode::NOT_FOUND {
            let path = match self {
                Self::NotFound(path) => path.clone(),
                _ => String::new(),
            };
            templates::render("core/404.html", context! { path })
        } else if status.is_server_error() {
            templates::render("core/500.html", context! {})
        } else {
            templates::render(
                "core/error.html",
                context! { status => status.as_u16(), message => self.to_string() },
            )
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = ?self, code = self.error_code(), "Server error occurred");
        } else if status != StatusCode::NOT_FOUND {
            warn!(error = %self, code = self.error_code(), status = status.as_u16(), "Request rejected");
        }

        match self.page(status) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(render_error) => {
                error!(error = ?render_error, "Failed to render error page");
                (status, status.canonical_reason().unwrap_or("Error")).into_response()
            }
        }
    }
}

/// Type alias for handler results
pub type WebResult<T> = Result<T, WebError>;

/// `302 Found` redirect
pub fn found(location: &str) -> Response {
    let location = HeaderValue::from_str(location).unwrap_or(HeaderValue::from_static("/"));
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Where anonymous users are sent, remembering the page they asked for
pub fn login_url(next: &str) -> String {
    let query = serde_urlencoded::to_string([("next", next)]).unwrap_or_default();
    format!("/auth/login/?{query}")
}

pub fn login_redirect(next: &str) -> Response {
    found(&login_url(next))
}

/// Accept only local absolute paths as a post-login destination
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}
