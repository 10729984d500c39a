//! Postgres persistence for the Shelfbot catalog.
//!
//! - [`models`]: row structs and create DTOs.
//! - [`repositories`]: zero-sized repo structs with async queries.
//! - [`catalog`]: [`PgCatalog`], the read-side adapter the delivery
//!   engine talks to.

use sqlx::postgres::PgPoolOptions;

pub mod catalog;
pub mod models;
pub mod repositories;

pub use catalog::PgCatalog;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
