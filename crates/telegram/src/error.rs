use std::time::Duration;

use shelfbot_core::sink::SinkError;

/// Fallback wait when a 429 arrives without `retry_after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Errors from the Bot API layer.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with `ok: false` or a non-JSON error page.
    #[error("Telegram API error ({code}): {description}")]
    Api {
        code: u16,
        description: String,
        retry_after: Option<u64>,
    },

    /// A success status whose body did not match the expected shape.
    #[error("Malformed Telegram response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TelegramError {
    /// Map onto the sink failure classes the dispatcher retries on.
    ///
    /// 429 is a rate limit, 5xx and transport failures are transient, and
    /// every other API rejection is permanent.
    pub fn classify(&self) -> SinkError {
        match self {
            TelegramError::Request(e) => SinkError::Transient(e.to_string()),
            TelegramError::Api {
                code: 429,
                retry_after,
                ..
            } => SinkError::RateLimited {
                retry_after: Duration::from_secs(
                    retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
                ),
            },
            TelegramError::Api { code, .. } if *code >= 500 => {
                SinkError::Transient(self.to_string())
            }
            TelegramError::Api { .. } | TelegramError::Decode(_) => {
                SinkError::Permanent(self.to_string())
            }
        }
    }
}

impl From<TelegramError> for SinkError {
    fn from(err: TelegramError) -> Self {
        err.classify()
    }
}
