//! [`DeliverySink`] over the Bot API.

use async_trait::async_trait;
use shelfbot_core::sink::{DeliverySink, SinkError};
use shelfbot_core::types::ChatId;

use crate::api::TelegramApi;
use crate::error::TelegramError;

#[async_trait]
impl DeliverySink for TelegramApi {
    async fn send_media_group(&self, chat_id: ChatId, file_ids: &[String]) -> Result<(), SinkError> {
        let result = TelegramApi::send_media_group(self, chat_id, file_ids).await;
        delivery_outcome(chat_id, file_ids.len(), result.map(drop))
    }
}

/// Map a send result onto the sink contract.
///
/// A decode failure only arises on a success status, so the album was
/// accepted; only the echoed messages could not be read. Reporting it as a
/// failure would tell the user delivery failed after the images arrived.
fn delivery_outcome(
    chat_id: ChatId,
    count: usize,
    result: Result<(), TelegramError>,
) -> Result<(), SinkError> {
    match result {
        Ok(()) => Ok(()),
        Err(TelegramError::Decode(e)) => {
            tracing::warn!(chat_id, count, error = %e, "Media group accepted with unreadable response");
            Ok(())
        }
        Err(e) => {
            let classified = e.classify();
            tracing::debug!(chat_id, count, error = %e, ?classified, "Media group rejected");
            Err(classified)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn unreadable_success_counts_as_delivered() {
        let err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert_eq!(delivery_outcome(1, 3, Err(TelegramError::Decode(err))), Ok(()));
    }

    #[test]
    fn api_rejection_is_classified() {
        let err = TelegramError::Api {
            code: 429,
            description: "Too Many Requests".into(),
            retry_after: Some(2),
        };
        assert_matches!(
            delivery_outcome(1, 3, Err(err)),
            Err(SinkError::RateLimited { .. })
        );
    }
}
