#![allow(dead_code)]

pub mod bot_api;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use shelfbot_bot::config::BotConfig;
use shelfbot_bot::routes;
use shelfbot_bot::state::AppState;

/// Config pointing at `api_url` with the given handler deadline.
pub fn config_for(api_url: &str, handler_timeout_secs: u64) -> BotConfig {
    let timeout = handler_timeout_secs.to_string();
    BotConfig::from_lookup(|key| match key {
        "BOT_TOKEN" => Some("0:test".to_string()),
        "DATABASE_URL" => Some("postgres://unused".to_string()),
        "TELEGRAM_API_URL" => Some(api_url.to_string()),
        "HANDLER_TIMEOUT_SECS" => Some(timeout.clone()),
        "VIP_RECHARGE_URL" => Some("https://pay.example.com".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Config with an unreachable API root, for tests that never reach Telegram.
pub fn test_config() -> BotConfig {
    config_for("http://127.0.0.1:9", 30)
}

/// Build the health router exactly as `main.rs` does.
pub fn build_test_app(pool: PgPool) -> Router {
    routes::app(AppState::new(pool, test_config()))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
