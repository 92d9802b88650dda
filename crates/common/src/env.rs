//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the media directory exists and is a directory; create it when missing.
pub async fn ensure_media_dir(media_dir: &Path) -> anyhow::Result<()> {
    match tokio::fs::metadata(media_dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("{} exists but is not a directory", media_dir.display())),
        Err(_) => {
            warn!(media_dir = %media_dir.display(), "media directory not found; creating it");
            tokio::fs::create_dir_all(media_dir)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", media_dir.display()))?;
            info!(media_dir = %media_dir.display(), "media directory created");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_media_dir() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let dir = tmp.path().join("uploads/nested");
        ensure_media_dir(&dir).await?;
        assert!(dir.is_dir());
        // second call is a no-op
        ensure_media_dir(&dir).await?;
        Ok(())
    }

    #[tokio::test]
    async fn rejects_file_in_place_of_dir() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let file = tmp.path().join("not_a_dir");
        std::fs::write(&file, b"x")?;
        assert!(ensure_media_dir(&file).await.is_err());
        Ok(())
    }
}
