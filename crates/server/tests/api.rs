use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use common::types::{NewProvider, Weekday};
use server::{routes, AppState};
use service::cache::PageCache;
use service::marketplace::repository::mock::MockMarketplaceRepository;
use service::media::LocalMediaStore;

struct TestApp {
    base_url: String,
    state: AppState,
    _media_dir: tempfile::TempDir,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let media_dir = tempfile::tempdir()?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let media = configs::MediaConfig {
        dir: media_dir.path().to_path_buf(),
        public_base_url: format!("{base_url}/media"),
        max_upload_bytes: 1024 * 1024,
    };
    let state = AppState::new(
        Arc::new(MockMarketplaceRepository::default()),
        PageCache::new(100, Duration::from_secs(60)),
        Arc::new(LocalMediaStore::from_config(&media)),
    );
    let app = routes::build_router(state.clone(), CorsLayer::very_permissive(), &media);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(TestApp { base_url, state, _media_dir: media_dir })
}

async fn seed(app: &TestApp, user_id: &str, company: &str) -> anyhow::Result<()> {
    let out = app
        .state
        .marketplace
        .register_provider(NewProvider {
            user_id: user_id.into(),
            company_name: company.into(),
            type_of_provider: "Cleaning".into(),
            phone_number: "5551234".into(),
            experience_years: 1,
            hourly_rate: 30,
            bio: "Tidy homes".into(),
            operating_days: [Weekday::Monday].into_iter().collect(),
            start_time: "08:00".into(),
            end_time: "17:00".into(),
        })
        .await?;
    assert!(out.is_ok());
    Ok(())
}

fn service_body(user_id: &str, name: &str) -> Value {
    json!({
        "userId": user_id,
        "image_url": "https://cdn.example.com/s.png",
        "serviceName": name,
        "typeOfService": "Cleaning",
        "description": "Every room",
        "duration": 60,
        "price": 45.0,
        "path": "/dashboard/services"
    })
}

fn profile_body(company: &str, days: &[&str]) -> Value {
    json!({
        "companyName": company,
        "typeOfProvider": "Cleaning",
        "phoneNumber": "5551234",
        "experienceYears": 4,
        "hourlyRate": 55,
        "bio": "Tidy homes",
        "operatingDays": days,
        "startTime": "08:00",
        "endTime": "17:00",
        "path": "/dashboard/profile"
    })
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn created_service_shows_up_in_cached_listing() -> anyhow::Result<()> {
    let app = start_server().await?;
    seed(&app, "u1", "Sparkle").await?;
    let client = reqwest::Client::new();
    let list_url = format!("{}/api/providers/u1/services", app.base_url);

    // warm the cache with the empty list
    let empty: Vec<Value> = client.get(&list_url).send().await?.json().await?;
    assert!(empty.is_empty());

    let res = client.post(format!("{}/api/services", app.base_url)).json(&service_body("u1", "Deep clean")).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;

    let listed: Vec<Value> = client.get(&list_url).send().await?.json().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);

    let detail: Value = client
        .get(format!("{}/api/services/{}", app.base_url, created["id"].as_str().unwrap_or_default()))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(detail["serviceName"], "Deep clean");
    assert_eq!(detail["provider"]["userId"], "u1");
    Ok(())
}

#[tokio::test]
async fn missing_targets_are_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    let res = client.post(format!("{}/api/services", app.base_url)).json(&service_body("ghost", "Deep clean")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "provider not found");

    let res = client.get(format!("{}/api/services/{}", app.base_url, uuid::Uuid::new_v4())).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(format!("{}/api/providers/ghost/services", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn invalid_service_is_400() -> anyhow::Result<()> {
    let app = start_server().await?;
    seed(&app, "u1", "Sparkle").await?;
    let mut body = service_body("u1", "Deep clean");
    body["price"] = json!(-1.0);
    let res = reqwest::Client::new().post(format!("{}/api/services", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Validation Error");
    Ok(())
}

#[tokio::test]
async fn update_service_without_image_keeps_it() -> anyhow::Result<()> {
    let app = start_server().await?;
    seed(&app, "u1", "Sparkle").await?;
    let client = reqwest::Client::new();
    let created: Value = client.post(format!("{}/api/services", app.base_url)).json(&service_body("u1", "Deep clean")).send().await?.json().await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let mut body = service_body("u1", "Deeper clean");
    if let Some(obj) = body.as_object_mut() {
        obj.remove("image_url");
        obj.remove("userId");
    }
    let res = client.put(format!("{}/api/services/{id}", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["serviceName"], "Deeper clean");
    assert_eq!(updated["image_url"], created["image_url"]);
    Ok(())
}

#[tokio::test]
async fn profile_update_persists_days_and_reports_conflicts() -> anyhow::Result<()> {
    let app = start_server().await?;
    seed(&app, "u1", "Sparkle").await?;
    seed(&app, "u2", "Shine").await?;
    let client = reqwest::Client::new();
    let profile_url = format!("{}/api/providers/u1/profile", app.base_url);

    let before: Value = client.get(&profile_url).send().await?.json().await?;
    assert_eq!(before["operatingDays"], json!(["Monday"]));

    let res = client.put(&profile_url).json(&profile_body("Sparkle", &["Wednesday", "Monday"])).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let after: Value = client.get(&profile_url).send().await?.json().await?;
    assert_eq!(after["operatingDays"], json!(["Monday", "Wednesday"]));
    assert_eq!(after["hourlyRate"], 55);

    let res = client
        .put(format!("{}/api/providers/u2/profile", app.base_url))
        .json(&profile_body("Sparkle", &["Monday"]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "company already exists");
    Ok(())
}

#[tokio::test]
async fn percent_encoded_user_ids_share_cache_keys_with_writes() -> anyhow::Result<()> {
    let app = start_server().await?;
    seed(&app, "user 1", "Sparkle").await?;
    let client = reqwest::Client::new();
    let profile_url = format!("{}/api/providers/user%201/profile", app.base_url);
    let list_url = format!("{}/api/providers/user%201/services", app.base_url);

    let before: Value = client.get(&profile_url).send().await?.json().await?;
    assert_eq!(before["operatingDays"], json!(["Monday"]));
    let empty: Vec<Value> = client.get(&list_url).send().await?.json().await?;
    assert!(empty.is_empty());

    let res = client.put(&profile_url).json(&profile_body("Sparkle", &["Wednesday", "Monday"])).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.post(format!("{}/api/services", app.base_url)).json(&service_body("user 1", "Deep clean")).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let after: Value = client.get(&profile_url).send().await?.json().await?;
    assert_eq!(after["operatingDays"], json!(["Monday", "Wednesday"]));
    let listed: Vec<Value> = client.get(&list_url).send().await?.json().await?;
    assert_eq!(listed.len(), 1);
    Ok(())
}

#[tokio::test]
async fn uploaded_media_is_served_back()-> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();
    let files = json!([{ "name": "logo.png", "mimeType": "image/png", "data": STANDARD.encode(b"not really a png") }]);
    let res = client.post(format!("{}/api/media", app.base_url)).json(&files).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let uploaded: Vec<Value> = res.json().await?;
    let url = uploaded[0]["url"].as_str().unwrap_or_default().to_string();
    assert!(url.starts_with(&format!("{}/media/", app.base_url)));

    let served = client.get(&url).send().await?;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await?.as_ref(), b"not really a png");

    let pdf = json!([{ "name": "doc.pdf", "mimeType": "application/pdf", "data": STANDARD.encode(b"%PDF") }]);
    let res = client.post(format!("{}/api/media", app.base_url)).json(&pdf).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
