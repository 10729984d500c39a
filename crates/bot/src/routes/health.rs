//! Liveness check for the bot process.
//!
//! The bot itself talks to Telegram by long polling, so this server exists
//! only for orchestrators. A degraded database answers 503 so the instance
//! is taken out of rotation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok` or `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Open connections in the pool, busy or idle.
    pub db_connections: u32,
    pub db_idle_connections: usize,
}

impl HealthReport {
    fn status_code(&self) -> StatusCode {
        if self.db_healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let db_healthy = match shelfbot_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };

    let report = HealthReport {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        db_connections: state.pool.size(),
        db_idle_connections: state.pool.num_idle(),
    };
    (report.status_code(), Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
