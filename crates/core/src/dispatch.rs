//! Page dispatch with exponential-backoff retry.
//!
//! [`BatchDispatcher::send_page`] slices one page out of an ordered item
//! list and sends it to the sink as a single media group. A failed group is
//! retried whole, never split, because the sink accepts or rejects the
//! group atomically. The attempt count and every individual wait are
//! bounded by [`RetryPolicy`].

use std::time::Duration;

use crate::pagination::page_range;
use crate::resource::ImageItem;
use crate::sink::{DeliverySink, SinkError};
use crate::types::ChatId;

/// Tunable parameters for the retry loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound on any single wait, including platform `retry_after` hints.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay, clamped to [`RetryPolicy::max_delay`].
pub fn next_delay(current: Duration, policy: &RetryPolicy) -> Duration {
    let next_ms = (current.as_millis() as f64 * policy.multiplier) as u64;
    Duration::from_millis(next_ms).min(policy.max_delay)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// The page was accepted by the sink.
    Sent { items: usize, attempts: u32 },
    /// The requested page holds no items; the sink was not called.
    EmptyPage,
    /// Every allowed attempt failed, or the failure was not retryable.
    Failed { attempts: u32, error: SinkError },
}

pub struct BatchDispatcher {
    policy: RetryPolicy,
}

impl BatchDispatcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send page `page` of `items` to `chat_id`, `batch_size` items per page.
    ///
    /// `batch_size` must already be within the sink's ceiling; it is
    /// validated once when the delivery config is built.
    pub async fn send_page(
        &self,
        sink: &dyn DeliverySink,
        chat_id: ChatId,
        items: &[ImageItem],
        page: usize,
        batch_size: usize,
    ) -> DispatchResult {
        let range = page_range(page, batch_size, items.len());
        if range.is_empty() {
            return DispatchResult::EmptyPage;
        }

        let batch: Vec<String> = items[range].iter().map(|i| i.file_id.clone()).collect();
        debug_assert!(batch.len() <= sink.max_batch());

        let max_attempts = self.policy.max_attempts.max(1);
        let mut delay = self.policy.initial_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let err = match sink.send_media_group(chat_id, &batch).await {
                Ok(()) => {
                    tracing::debug!(chat_id, page, items = batch.len(), attempt, "Page dispatched");
                    return DispatchResult::Sent {
                        items: batch.len(),
                        attempts: attempt,
                    };
                }
                Err(e) => e,
            };

            if !err.is_retryable() || attempt >= max_attempts {
                tracing::error!(
                    chat_id,
                    page,
                    attempt,
                    error = %err,
                    "Page dispatch failed",
                );
                return DispatchResult::Failed {
                    attempts: attempt,
                    error: err,
                };
            }

            let wait = match &err {
                SinkError::RateLimited { retry_after } => delay.max(*retry_after),
                _ => delay,
            };
            if wait > self.policy.max_delay {
                tracing::error!(
                    chat_id,
                    page,
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "Requested wait exceeds retry ceiling, giving up",
                );
                return DispatchResult::Failed {
                    attempts: attempt,
                    error: err,
                };
            }

            tracing::warn!(
                chat_id,
                page,
                attempt,
                wait_ms = wait.as_millis() as u64,
                error = %err,
                "Page dispatch attempt failed, retrying",
            );
            tokio::time::sleep(wait).await;
            delay = next_delay(delay, &self.policy);
        }
    }
}

impl Default for BatchDispatcher {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}
