use async_trait::async_trait;
use reqwest::Url;
use tracing::{info, instrument};

use common::media::{MediaUploader, UploadError};
use common::types::{MediaFile, UploadedMedia};

use crate::errors::ClientError;
use crate::gateway::{endpoint, error_message, http_client, parse_base};

/// Uploads files through `POST /api/media`.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    base: Url,
    http: reqwest::Client,
}

impl HttpUploader {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self { base: parse_base(base_url)?, http: http_client()? })
    }
}

#[async_trait]
impl MediaUploader for HttpUploader {
    #[instrument(skip(self, files), fields(count = files.len()))]
    async fn start_upload(&self, files: Vec<MediaFile>) -> Result<Vec<UploadedMedia>, UploadError> {
        let url = endpoint(&self.base, &["api", "media"]).map_err(|e| UploadError::Transport(e.to_string()))?;
        let res = self
            .http
            .post(url)
            .json(&files)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;
        let status = res.status();
        if status.is_client_error() {
            return Err(UploadError::Rejected(error_message(res).await));
        }
        if !status.is_success() {
            return Err(UploadError::Storage(error_message(res).await));
        }
        let uploaded: Vec<UploadedMedia> = res.json().await.map_err(|e| UploadError::Transport(e.to_string()))?;
        info!(count = uploaded.len(), "upload_complete");
        Ok(uploaded)
    }
}
