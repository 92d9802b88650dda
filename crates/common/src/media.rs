//! Upload port used by the profile form and implemented by the server's
//! media store and the HTTP client.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{MediaFile, UploadedMedia};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("upload storage error: {0}")]
    Storage(String),
    #[error("upload transport error: {0}")]
    Transport(String),
}

/// Accepts locally selected files and returns one durable URL per file, in
/// submission order.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn start_upload(&self, files: Vec<MediaFile>) -> Result<Vec<UploadedMedia>, UploadError>;
}

/// Whether a MIME type names an image.
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// File extension for the image MIME types the store accepts.
pub fn image_extension(mime: &str) -> Option<&'static str> {
    match mime.trim().to_ascii_lowercase().as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        "image/avif" => Some("avif"),
        _ => None,
    }
}
