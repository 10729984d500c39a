//! External delivery sink seam.
//!
//! The sink transmits a grouped-media message to a chat. One call is atomic
//! from the engine's point of view: the whole group is accepted or rejected.

use std::time::Duration;

use async_trait::async_trait;

use crate::delivery::SINK_MAX_BATCH;
use crate::types::ChatId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The platform asked us to slow down.
    #[error("Rate limited, retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// Network trouble or a server-side hiccup; the same call may succeed later.
    #[error("Transient sink failure: {0}")]
    Transient(String),

    /// The platform rejected the request itself; retrying cannot help.
    #[error("Permanent sink failure: {0}")]
    Permanent(String),
}

impl SinkError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SinkError::Permanent(_))
    }
}

#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// Largest group a single call accepts.
    fn max_batch(&self) -> usize {
        SINK_MAX_BATCH
    }

    /// Send `file_ids` to `chat_id` as one media group, in order.
    async fn send_media_group(&self, chat_id: ChatId, file_ids: &[String]) -> Result<(), SinkError>;
}
