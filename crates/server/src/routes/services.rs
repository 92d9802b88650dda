use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;

use common::types::{CreateServiceInput, ServiceDetail, ServiceRecord, UpdateServiceInput};
use common::ActionOutcome;
use service::cache::CacheInvalidator;

use crate::errors::{outcome, JsonApiError};
use crate::routes::services_page;
use crate::state::AppState;

pub async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ServiceDetail>, JsonApiError> {
    let detail = outcome(state.marketplace.get_service(&id).await?)?;
    Ok(Json(detail))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateServiceInput>,
) -> Result<(StatusCode, Json<ServiceRecord>), JsonApiError> {
    let user_id = input.user_id.clone();
    let created = outcome(state.marketplace.create_service(input).await?)?;
    state.pages.revalidate(&services_page(&user_id)).await;
    info!(service_id = %created.id, %user_id, "create_service_request_ok");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut input): Json<UpdateServiceInput>,
) -> Result<Json<ServiceRecord>, JsonApiError> {
    input.service_id = uuid::Uuid::parse_str(&id)
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(format!("invalid service id: {e}"))))?;
    let updated = outcome(state.marketplace.update_service(input).await?)?;
    if let Ok(ActionOutcome::Ok(detail)) = state.marketplace.get_service(&id).await {
        state.pages.revalidate(&services_page(&detail.provider.user_id)).await;
    }
    Ok(Json(updated))
}

/// Cached under the same key `create`/`update` revalidate.
pub async fn list_for_provider(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, JsonApiError> {
    let key = services_page(&user_id);
    let (marketplace, user_id) = (&state.marketplace, user_id.as_str());
    let page = state
        .pages
        .get_or_render(&key, move || async move {
            let services = marketplace.fetch_services(user_id).await?;
            Ok::<_, JsonApiError>(Some(serde_json::to_value(services).map_err(|e| {
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Render Failed", Some(e.to_string()))
            })?))
        })
        .await?;
    Ok(Json((*page).clone()))
}
