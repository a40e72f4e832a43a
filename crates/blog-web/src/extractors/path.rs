//! Path identifier extractors

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use blog_core::Snowflake;

use crate::response::WebError;

/// `:post_id` path segment. An identifier that does not parse is an unknown
/// page, not a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostId(pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_string();
        let not_found = || WebError::NotFound(path.clone());

        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found())?;

        params
            .get("post_id")
            .and_then(|raw| Snowflake::parse(raw).ok())
            .map(Self)
            .ok_or_else(not_found)
    }
}
