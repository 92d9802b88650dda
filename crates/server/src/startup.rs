use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use common::env::ensure_media_dir;
use common::types::{NewProvider, Weekday};
use common::utils::logging::init_logging_from_env;
use common::ActionOutcome;
use configs::AppConfig;
use service::{cache::PageCache, marketplace::repo::seaorm::SeaOrmMarketplaceRepository, media::LocalMediaStore};

use crate::errors::StartupError;
use crate::{routes, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

async fn connect_and_migrate(cfg: &AppConfig) -> Result<DatabaseConnection, StartupError> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::test_connection(&db).await?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Runtime(format!("migrations failed: {e}")))?;
    Ok(db)
}

/// Assemble the application state and router from a loaded config.
pub fn build_app(cfg: &AppConfig, db: DatabaseConnection) -> Router {
    let repo = Arc::new(SeaOrmMarketplaceRepository::new(db));
    let pages = PageCache::from_config(&cfg.cache);
    let media = Arc::new(LocalMediaStore::from_config(&cfg.media));
    let state = AppState::new(repo, pages, media);
    routes::build_router(state, build_cors(), &cfg.media)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;
    ensure_media_dir(&cfg.media.dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let db = connect_and_migrate(&cfg).await?;

    let app = build_app(&cfg, db);
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, media_dir = %cfg.media.dir.display(), media_url = %cfg.media.public_base_url, "starting marketplace server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Register a demo provider so the API has something to serve.
pub async fn seed_demo() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;
    let db = connect_and_migrate(&cfg).await?;
    let state = AppState::new(
        Arc::new(SeaOrmMarketplaceRepository::new(db)),
        PageCache::from_config(&cfg.cache),
        Arc::new(LocalMediaStore::from_config(&cfg.media)),
    );
    let demo = NewProvider {
        user_id: "demo-user".into(),
        company_name: "Demo Cleaning Co".into(),
        type_of_provider: "Cleaning".into(),
        phone_number: "+1 555 0100".into(),
        experience_years: 5,
        hourly_rate: 40,
        bio: "Homes and offices, weekly or one-off.".into(),
        operating_days: [Weekday::Monday, Weekday::Wednesday, Weekday::Friday].into_iter().collect(),
        start_time: "08:00".into(),
        end_time: "17:00".into(),
    };
    match state.marketplace.register_provider(demo).await? {
        ActionOutcome::Ok(p) => info!(provider_id = %p.id, user_id = %p.user_id, "demo provider seeded"),
        ActionOutcome::Conflict(m) | ActionOutcome::NotFound(m) => warn!(reason = %m, "demo provider not seeded"),
    }
    Ok(())
}
