use std::net::SocketAddr;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfbot_bot::config::BotConfig;
use shelfbot_bot::state::AppState;
use shelfbot_bot::{poller, routes};

/// Extra wait on top of the poller's own drain window.
const POLLER_STOP_SLACK_SECS: u64 = 5;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "shelfbot_bot=debug,shelfbot_core=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = BotConfig::from_env().expect("Invalid configuration");
    tracing::info!(?config, "Loaded bot configuration");

    // --- Database ---
    let pool = shelfbot_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    shelfbot_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- App state ---
    let state = AppState::new(pool, config);
    tracing::info!(
        batch_size = state.orchestrator.config().batch_size(),
        free_view_limit = state.orchestrator.config().free_view_limit(),
        "Delivery engine ready",
    );

    // --- Telegram ---
    state
        .api
        .delete_webhook(true)
        .await
        .expect("Failed to clear webhook");
    let me = state.api.get_me().await.expect("Bot token rejected");
    tracing::info!(bot_id = me.id, username = ?me.username, "Authenticated with Telegram");

    let cancel = CancellationToken::new();
    let handler_timeout_secs = state.config.handler_timeout_secs;

    // --- Update poller ---
    let poller_handle = tokio::spawn(poller::run(state.clone(), cancel.clone()));

    // --- Health server ---
    let addr = SocketAddr::new(
        state
            .config
            .health_host
            .parse()
            .expect("Invalid HEALTH_HOST address"),
        state.config.health_port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind health server");
    tracing::info!(%addr, "Health server listening");

    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, routes::app(state))
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
    });

    // --- Shutdown ---
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl-C handler");
    tracing::info!("Shutdown signal received");
    cancel.cancel();

    let poller_wait =
        poller::drain_window(handler_timeout_secs) + Duration::from_secs(POLLER_STOP_SLACK_SECS);
    if tokio::time::timeout(poller_wait, poller_handle).await.is_err() {
        tracing::warn!("Update poller did not stop in time");
    } else {
        tracing::info!("Update poller stopped");
    }

    match tokio::time::timeout(Duration::from_secs(5), server_handle).await {
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "Health server error"),
        Ok(_) => tracing::info!("Health server stopped"),
        Err(_) => tracing::warn!("Health server did not stop in time"),
    }

    tracing::info!("Graceful shutdown complete");
}
