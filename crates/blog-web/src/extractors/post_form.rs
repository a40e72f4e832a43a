//! Post form extractor
//!
//! The post form is normally `multipart/form-data` because it carries an
//! image. A url-encoded body is accepted too and simply has no image.

use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form,
};
use blog_service::{PostForm, UploadedFile};
use serde::Deserialize;

use crate::response::WebError;

/// Checkbox that removes the current image on edit
const CLEAR_IMAGE_FIELD: &str = "image-clear";

#[derive(Debug, Default, Deserialize)]
struct UrlEncodedPost {
    #[serde(default)]
    text: String,
    #[serde(default)]
    group: String,
    #[serde(default, rename = "image-clear")]
    image_clear: Option<String>,
}

/// A submitted [`PostForm`], not yet validated
#[derive(Debug)]
pub struct PostFormData(pub PostForm);

#[async_trait]
impl<S> FromRequest<S> for PostFormData
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| WebError::BadRequest(rejection.body_text()))?;
            return read_multipart(multipart).await.map(Self);
        }

        let Form(raw) = Form::<UrlEncodedPost>::from_request(req, state)
            .await
            .map_err(|rejection| WebError::BadRequest(rejection.body_text()))?;

        let mut form = PostForm::new(raw.text, raw.group);
        form.clear_image = raw.image_clear.is_some();
        Ok(Self(form))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<PostForm, WebError> {
    let mut form = PostForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" => form.text = field.text().await.map_err(multipart_error)?,
            "group" => form.group = field.text().await.map_err(multipart_error)?,
            CLEAR_IMAGE_FIELD => {
                field.bytes().await.map_err(multipart_error)?;
                form.clear_image = true;
            }
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // browsers send an empty, nameless part when no file was picked
                if !file_name.is_empty() || !bytes.is_empty() {
                    form.image = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown post form field"),
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> WebError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        WebError::PayloadTooLarge
    } else {
        WebError::BadRequest(err.body_text())
    }
}
