use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub mod media;
pub mod profile;
pub mod services;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Read path cached for a provider's service list.
pub fn services_page(user_id: &str) -> String { format!("/api/providers/{user_id}/services") }

/// Read path cached for a provider's profile.
pub fn profile_page(user_id: &str) -> String { format!("/api/providers/{user_id}/profile") }

/// Build the application router: health, marketplace API, media upload and
/// static serving of uploaded files.
pub fn build_router(state: AppState, cors: CorsLayer, media: &configs::MediaConfig) -> Router {
    // base64 inflates payloads by a third; leave room for the JSON envelope
    let upload_limit = usize::try_from(media.max_upload_bytes.saturating_mul(4) / 3 + 64 * 1024).unwrap_or(usize::MAX);

    let api = Router::new()
        .route("/api/services", post(services::create))
        .route("/api/services/:id", get(services::get_one).put(services::update))
        .route("/api/providers/:user_id/services", get(services::list_for_provider))
        .route("/api/providers/:user_id/profile", get(profile::get_profile).put(profile::update_profile))
        .route("/api/media", post(media::upload).layer(DefaultBodyLimit::max(upload_limit)));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .nest_service("/media", ServeDir::new(&media.dir))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
