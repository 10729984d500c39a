use std::sync::Arc;

use shelfbot_core::dispatch::BatchDispatcher;
use shelfbot_core::orchestrator::DeliveryOrchestrator;
use shelfbot_core::sink::DeliverySink;
use shelfbot_db::PgCatalog;
use shelfbot_telegram::TelegramApi;

use crate::config::BotConfig;

/// Shared state handed to every update handler and the health route.
///
/// Cheaply cloneable; heavy members sit behind `Arc` or are `Clone` handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: shelfbot_db::DbPool,
    pub config: Arc<BotConfig>,
    /// Bot API client for replies and callback answers.
    pub api: TelegramApi,
    pub orchestrator: Arc<DeliveryOrchestrator>,
}

impl AppState {
    /// Wire the orchestrator over Postgres and the Bot API.
    pub fn new(pool: shelfbot_db::DbPool, config: BotConfig) -> Self {
        let api = TelegramApi::new(&config.telegram_api_url, &config.bot_token);
        let catalog = Arc::new(PgCatalog::new(pool.clone()));
        let delivery = config.delivery(api.max_batch());

        let orchestrator = DeliveryOrchestrator::new(
            catalog.clone(),
            catalog,
            Arc::new(api.clone()),
            BatchDispatcher::new(config.retry_policy()),
            delivery,
        );

        Self {
            pool,
            config: Arc::new(config),
            api,
            orchestrator: Arc::new(orchestrator),
        }
    }
}
