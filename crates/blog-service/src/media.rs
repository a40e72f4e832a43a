//! Uploaded image storage on the local disk
//!
//! Files land in `<media_root>/posts/` and posts store the path relative to
//! the root (`posts/<name>`). Names are reduced to a safe character set; when
//! a name is taken a random 7 character suffix is appended to the stem.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, warn};

use crate::forms::UploadedFile;

/// Directory under the media root that holds post images
pub const UPLOAD_DIR: &str = "posts";
/// URL prefix the media root is served under
pub const MEDIA_URL: &str = "/media/";

const SUFFIX_LEN: usize = 7;
const MAX_NAME_ATTEMPTS: usize = 8;
/// Longest stored path (`posts/<name>`), suffix included
pub const MAX_STORED_PATH: usize = 100;
/// Longest sanitized name; leaves room for `posts/` and `_XXXXXXX`
const MAX_NAME_LEN: usize = MAX_STORED_PATH - UPLOAD_DIR.len() - 1 - (SUFFIX_LEN + 1);
const MAX_EXT_LEN: usize = 10;

pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The upload is not acceptable; the message is shown next to the field
    #[error("{0}")]
    Invalid(String),

    #[error("media io: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not find a free name for {0}")]
    NameExhausted(String),
}

/// Local directory for uploaded post images
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    max_bytes: usize,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &blog_common::StorageConfig) -> Self {
        Self::new(&config.media_root, config.max_upload_bytes())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Public URL for a stored relative path
    pub fn url(path: &str) -> String {
        format!("{MEDIA_URL}{path}")
    }

    /// Check that an upload looks like an image we can keep
    pub fn validate(&self, file: &UploadedFile) -> Result<(), MediaError> {
        if file.bytes.is_empty() {
            return Err(MediaError::Invalid(
                "The submitted file is empty.".to_string(),
            ));
        }
        if file.bytes.len() > self.max_bytes {
            return Err(MediaError::Invalid(format!(
                "The file is too large. Uploads are limited to {} MB.",
                self.max_bytes / (1024 * 1024)
            )));
        }
        let declared_image = file
            .content_type
            .as_deref()
            .map_or(true, |ct| ct.starts_with("image/"));
        if !declared_image || sniff_image(&file.bytes).is_none() {
            return Err(MediaError::Invalid(INVALID_IMAGE.to_string()));
        }
        Ok(())
    }

    /// Validate and write an upload, returning its path relative to the root
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn save(&self, file: &UploadedFile) -> Result<String, MediaError> {
        self.validate(file)?;

        let dir = self.root.join(UPLOAD_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let base = sanitize_file_name(&file.file_name);
        let mut candidate = base.clone();
        for _ in 0..MAX_NAME_ATTEMPTS {
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dir.join(&candidate))
                .await
            {
                Ok(out) => {
                    write_or_remove(out, &dir.join(&candidate), &file.bytes).await?;
                    debug!(name = %candidate, "Stored upload");
                    return Ok(format!("{UPLOAD_DIR}/{candidate}"));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    candidate = with_random_suffix(&base);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(MediaError::NameExhausted(base))
    }

    /// Remove a stored file; a file that is already gone is not an error
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<(), MediaError> {
        let Some(full) = self.resolve(path) else {
            warn!("Refusing to delete path outside the media root");
            return Ok(());
        };
        match tokio::fs::remove_file(full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Absolute location of a stored relative path, if it stays under the root
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let plain = relative
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)));
        plain.then(|| self.root.join(relative))
    }
}

/// Write `bytes` to a freshly created file, removing it again when the write
/// fails so no truncated upload is left behind
async fn write_or_remove<W>(mut out: W, path: &Path, bytes: &[u8]) -> Result<(), MediaError>
where
    W: AsyncWrite + Unpin,
{
    let written = match out.write_all(bytes).await {
        Ok(()) => out.flush().await,
        Err(e) => Err(e),
    };
    let Err(e) = written else {
        return Ok(());
    };
    drop(out);
    if let Err(cleanup) = tokio::fs::remove_file(path).await {
        warn!(error = %cleanup, path = %path.display(), "Failed to remove partial upload");
    }
    Err(e.into())
}

/// Image format recognised from the leading bytes
pub fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"GIF87a", "gif"),
        (b"GIF89a", "gif"),
        (b"\x89PNG\r\n\x1a\n", "png"),
        (b"\xff\xd8\xff", "jpeg"),
        (b"BM", "bmp"),
    ];
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("webp");
    }
    SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, format)| *format)
}

/// Reduce a client supplied name to its last path component made of
/// `[A-Za-z0-9._-]`, with spaces turned into underscores. Long stems are cut
/// so the stored path never exceeds [`MAX_STORED_PATH`].
pub fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        truncate_name(cleaned)
    }
}

/// Cut an ASCII name to [`MAX_NAME_LEN`], keeping a short extension
fn truncate_name(name: &str) -> String {
    if name.len() <= MAX_NAME_LEN {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() <= MAX_EXT_LEN => {
            let keep = MAX_NAME_LEN - ext.len() - 1;
            format!("{}.{ext}", &stem[..keep.min(stem.len())])
        }
        _ => name[..MAX_NAME_LEN].to_string(),
    }
}

fn with_random_suffix(name: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect();
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{name}_{suffix}"),
    }
}
