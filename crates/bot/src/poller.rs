//! Long-polling update loop.
//!
//! Fetches updates with `getUpdates` and spawns one task per update, so a
//! slow delivery never holds up other users. The offset advances past every
//! fetched update before handling starts; an update is never redelivered.

use std::time::Duration;

use shelfbot_core::dispatch::{next_delay, RetryPolicy};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::handlers;
use crate::state::AppState;

/// Time past the handler deadline allowed for the timeout notice to go out.
const DRAIN_SLACK: Duration = Duration::from_secs(5);

/// How long shutdown waits for in-flight handlers: long enough for any of
/// them to finish or hit its own deadline and reply.
pub fn drain_window(handler_timeout_secs: u64) -> Duration {
    Duration::from_secs(handler_timeout_secs) + DRAIN_SLACK
}

/// Backoff between failed `getUpdates` calls.
fn poll_backoff() -> RetryPolicy {
    RetryPolicy {
        max_attempts: u32::MAX,
        initial_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(30),
        multiplier: 2.0,
    }
}

/// Run the update loop until `cancel` fires, then drain in-flight handlers.
pub async fn run(state: AppState, cancel: CancellationToken) {
    let tracker = TaskTracker::new();
    let backoff = poll_backoff();
    let mut delay = backoff.initial_delay;
    let mut offset: i64 = 0;
    let timeout = state.config.poll_timeout_secs;
    let drain = drain_window(state.config.handler_timeout_secs);

    tracing::info!(poll_timeout_secs = timeout, "Update poller started");

    loop {
        let batch = tokio::select! {
            _ = cancel.cancelled() => break,
            batch = state.api.get_updates(offset, timeout) => batch,
        };

        match batch {
            Ok(updates) => {
                delay = backoff.initial_delay;
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    tracker.spawn(handlers::handle_update(state.clone(), update));
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, retry_in_ms = delay.as_millis() as u64, "getUpdates failed");
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
                delay = next_delay(delay, &backoff);
            }
        }
    }

    tracing::info!(in_flight = tracker.len(), "Update poller shutting down");
    tracker.close();
    if tokio::time::timeout(drain, tracker.wait()).await.is_err() {
        tracing::warn!("In-flight handlers did not finish before shutdown");
    }
}
