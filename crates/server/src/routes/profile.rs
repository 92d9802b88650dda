use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use common::types::{ProviderProfile, UpdateProfileInput};
use service::cache::CacheInvalidator;

use crate::errors::{outcome, JsonApiError};
use crate::routes::profile_page;
use crate::state::AppState;

/// Cached under the decoded user id so writes can revalidate it; a missing
/// provider is a 404 and is not cached.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, JsonApiError> {
    let key = profile_page(&user_id);
    let (marketplace, user_id) = (&state.marketplace, user_id.as_str());
    let page = state
        .pages
        .get_or_render(&key, move || async move {
            let profile = outcome(marketplace.get_profile(user_id).await?)?;
            serde_json::to_value(profile)
                .map(Some)
                .map_err(|e| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Render Failed", Some(e.to_string())))
        })
        .await?;
    Ok(Json((*page).clone()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(mut input): Json<UpdateProfileInput>,
) -> Result<Json<ProviderProfile>, JsonApiError> {
    input.user_id = user_id.clone();
    let updated = outcome(state.marketplace.update_profile(input).await?)?;
    state.pages.revalidate(&profile_page(&user_id)).await;
    Ok(Json(updated))
}
