//! Local filesystem media store.
//!
//! Files are written under the configured directory with generated names and
//! served back by the HTTP layer under `public_base_url`.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::fs;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use common::media::{image_extension, is_image_mime, MediaUploader, UploadError};
use common::types::{MediaFile, UploadedMedia};

#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    dir: PathBuf,
    public_base_url: String,
    max_bytes: u64,
}

impl LocalMediaStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>, max_bytes: u64) -> Self {
        let mut public_base_url = public_base_url.into();
        while public_base_url.ends_with('/') {
            public_base_url.pop();
        }
        Self { dir: dir.into(), public_base_url, max_bytes }
    }

    pub fn from_config(cfg: &configs::MediaConfig) -> Self {
        Self::new(cfg.dir.clone(), cfg.public_base_url.clone(), cfg.max_upload_bytes)
    }

    /// Decode and check one file without touching the disk.
    fn prepare(&self, file: &MediaFile) -> Result<(String, Vec<u8>), UploadError> {
        if !is_image_mime(&file.mime_type) {
            return Err(UploadError::Rejected(format!("{} is not an image", file.name)));
        }
        let ext = image_extension(&file.mime_type)
            .ok_or_else(|| UploadError::Rejected(format!("unsupported image type {}", file.mime_type)))?;
        let bytes = STANDARD
            .decode(file.data.trim())
            .map_err(|e| UploadError::Rejected(format!("{}: invalid base64: {e}", file.name)))?;
        if bytes.is_empty() {
            return Err(UploadError::Rejected(format!("{} is empty", file.name)));
        }
        if bytes.len() as u64 > self.max_bytes {
            return Err(UploadError::Rejected(format!("{} exceeds {} bytes", file.name, self.max_bytes)));
        }
        Ok((format!("{}.{}", Uuid::new_v4().simple(), ext), bytes))
    }
}

#[async_trait]
impl MediaUploader for LocalMediaStore {
    /// All files are checked before any is written, so a rejected batch
    /// leaves nothing behind.
    #[instrument(skip(self, files), fields(count = files.len()))]
    async fn start_upload(&self, files: Vec<MediaFile>) -> Result<Vec<UploadedMedia>, UploadError> {
        let prepared = files
            .iter()
            .map(|f| self.prepare(f))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| warn!(error = %e, "upload_rejected"))?;

        fs::create_dir_all(&self.dir).await.map_err(|e| UploadError::Storage(e.to_string()))?;

        let mut uploaded = Vec::with_capacity(prepared.len());
        for (file, (stored_name, bytes)) in files.iter().zip(prepared) {
            let path = self.dir.join(&stored_name);
            fs::write(&path, &bytes).await.map_err(|e| UploadError::Storage(e.to_string()))?;
            let url = format!("{}/{}", self.public_base_url, stored_name);
            info!(name = %file.name, %url, size = bytes.len(), "media_stored");
            uploaded.push(UploadedMedia { url, name: file.name.clone(), size: bytes.len() as u64 });
        }
        Ok(uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str, bytes: &[u8]) -> MediaFile {
        MediaFile { name: name.into(), mime_type: "image/png".into(), data: STANDARD.encode(bytes) }
    }

    #[tokio::test]
    async fn stores_files_in_order() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let store = LocalMediaStore::new(tmp.path(), "http://localhost:8080/media/", 1024);
        let out = store.start_upload(vec![png("a.png", b"first"), png("b.png", b"second!")]).await?;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "a.png");
        assert_eq!(out[1].size, 7);
        assert!(out[0].url.starts_with("http://localhost:8080/media/"));
        assert!(out[0].url.ends_with(".png"));

        let stored = out[1].url.rsplit('/').next().unwrap();
        assert_eq!(std::fs::read(tmp.path().join(stored))?, b"second!");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_batch_writes_nothing() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let store = LocalMediaStore::new(tmp.path().join("m"), "http://x/media", 1024);
        let pdf = MediaFile { name: "doc.pdf".into(), mime_type: "application/pdf".into(), data: STANDARD.encode(b"%PDF") };
        let err = store.start_upload(vec![png("a.png", b"ok"), pdf]).await.unwrap_err();
        assert!(matches!(err, UploadError::Rejected(_)));
        assert!(!tmp.path().join("m").exists());
        Ok(())
    }

    #[tokio::test]
    async fn enforces_size_and_encoding() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(tmp.path(), "http://x/media", 4);
        assert!(store.start_upload(vec![png("big.png", b"12345")]).await.is_err());
        let bad = MediaFile { name: "x.png".into(), mime_type: "image/png".into(), data: "***".into() };
        assert!(store.start_upload(vec![bad]).await.is_err());
    }
}
