use axum::{extract::State, Json};
use tracing::info;

use common::types::{MediaFile, UploadedMedia};

use crate::errors::JsonApiError;
use crate::state::AppState;

/// Store a batch of base64 files; one URL per file in submission order.
pub async fn upload(
    State(state): State<AppState>,
    Json(files): Json<Vec<MediaFile>>,
) -> Result<Json<Vec<UploadedMedia>>, JsonApiError> {
    let uploaded = state.media.start_upload(files).await?;
    info!(count = uploaded.len(), "media_upload_ok");
    Ok(Json(uploaded))
}
