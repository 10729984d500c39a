use std::time::Duration;

use shelfbot_core::error::DeliveryError;
use shelfbot_telegram::TelegramError;

/// Failure while handling one update.
///
/// None of these reach the user verbatim; the handler logs them and falls
/// back to a generic reply.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Telegram(#[from] TelegramError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Handler timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

pub type BotResult<T> = Result<T, BotError>;
