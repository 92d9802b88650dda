#![cfg(test)]
use migration::MigratorTrait;
use models::db::{connect_with_config, resolve_config};
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Migrations run once per test process; `false` means the database is unusable
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// Fresh connection for the current test's runtime, or `None` when no
/// database is configured or reachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip: DATABASE_URL not set");
        return None;
    }
    let ready = *MIGRATED
        .get_or_init(|| async {
            let cfg = resolve_config();
            match connect_with_config(&cfg).await {
                Ok(db) => match migration::Migrator::up(&db, None).await {
                    Ok(()) => true,
                    Err(e) => {
                        eprintln!("skip: migrate up failed: {e}");
                        false
                    }
                },
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {e}");
                    false
                }
            }
        })
        .await;
    if !ready {
        return None;
    }

    let mut cfg = resolve_config();
    cfg.max_connections = cfg.max_connections.max(5);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout_secs = 10;
    connect_with_config(&cfg).await.ok()
}
