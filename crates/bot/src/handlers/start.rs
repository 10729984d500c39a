//! `/start <payload>` deep-link entry point.

use shelfbot_telegram::types::{Message, SendMessage};

use super::{reply, touch_user, user_ref};
use crate::error::BotResult;
use crate::render::{GENERIC_FAILURE, WELCOME};
use crate::state::AppState;

pub async fn handle(state: &AppState, message: Message) -> BotResult<()> {
    let Some(payload) = start_payload(message.text.as_deref()) else {
        return Ok(());
    };
    let Some(from) = message.from.as_ref() else {
        return Ok(());
    };
    let chat_id = message.chat.id;
    let user = user_ref(from);
    touch_user(state, &user).await;

    if payload.is_empty() {
        state
            .api
            .send_message(&SendMessage::text(chat_id, WELCOME))
            .await?;
        return Ok(());
    }

    tracing::info!(user_id = user.id, chat_id, payload, "Deep link opened");
    match state.orchestrator.open(&user, chat_id, payload).await {
        Ok(outcome) => reply(state, chat_id, &outcome, false).await,
        Err(e) => {
            tracing::error!(user_id = user.id, payload, error = %e, "Deep link delivery failed");
            state
                .api
                .send_message(&SendMessage::text(chat_id, GENERIC_FAILURE))
                .await?;
            Ok(())
        }
    }
}

/// Extract the argument of a `/start` command.
///
/// Returns `None` for anything that is not `/start`, and `Some("")` for a
/// bare `/start`. The `/start@botname` form is accepted.
pub fn start_payload(text: Option<&str>) -> Option<&str> {
    let text = text?.trim();
    let (command, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let is_start = command == "/start"
        || command
            .strip_prefix("/start@")
            .is_some_and(|bot| !bot.is_empty());
    is_start.then(|| rest.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_payload() {
        assert_eq!(start_payload(Some("/start comic_abc")), Some("comic_abc"));
        assert_eq!(start_payload(Some("/start@shelf_bot comic_abc")), Some("comic_abc"));
    }

    #[test]
    fn bare_start_is_empty_payload() {
        assert_eq!(start_payload(Some("/start")), Some(""));
        assert_eq!(start_payload(Some("  /start   ")), Some(""));
    }

    #[test]
    fn other_text_is_ignored() {
        assert_eq!(start_payload(Some("hello")), None);
        assert_eq!(start_payload(Some("/startle x")), None);
        assert_eq!(start_payload(Some("/start@ x")), None);
        assert_eq!(start_payload(None), None);
    }
}
