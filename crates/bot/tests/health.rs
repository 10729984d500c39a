//! The `/health` endpoint as a load balancer sees it.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn reachable_database_reports_ok(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_json(response).await;
    assert_eq!(report["status"], "ok");
    assert_eq!(report["db_healthy"], true);
    assert_eq!(report["version"], env!("CARGO_PKG_VERSION"));
    assert!(report["db_connections"].as_u64().unwrap() >= 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn closed_pool_takes_instance_out_of_rotation(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    pool.close().await;

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let report = body_json(response).await;
    assert_eq!(report["status"], "degraded");
    assert_eq!(report["db_healthy"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_health_is_served(pool: PgPool) {
    for path in ["/", "/api/v1/health", "/healthz"] {
        let response = get(common::build_test_app(pool.clone()), path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }
}
