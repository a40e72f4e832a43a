//! Page number extractor

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, extract::Query, http::request::Parts};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
}

/// The `page` query parameter. Anything that is not an integer reads as
/// absent, so the feed falls back to its first page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageNumber(pub Option<i64>);

impl PageNumber {
    fn parse(raw: &str) -> Self {
        Self(raw.trim().parse::<i64>().ok())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageNumber
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let page = Query::<PageQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.page)
            .map_or(Self(None), |raw| Self::parse(&raw));
        Ok(page)
    }
}
