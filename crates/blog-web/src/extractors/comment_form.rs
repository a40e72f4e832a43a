//! Comment form extractor

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Form,
};
use blog_service::CommentForm;
use serde::Deserialize;

use crate::response::WebError;

#[derive(Debug, Default, Deserialize)]
struct UrlEncodedComment {
    #[serde(default)]
    text: String,
}

/// A submitted [`CommentForm`]; a body that is not a url-encoded form is a
/// `400` error page
#[derive(Debug)]
pub struct CommentFormData(pub CommentForm);

#[async_trait]
impl<S> FromRequest<S> for CommentFormData
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(raw) = Form::<UrlEncodedComment>::from_request(req, state)
            .await
            .map_err(|rejection| WebError::BadRequest(rejection.body_text()))?;
        Ok(Self(CommentForm::new(raw.text)))
    }
}
