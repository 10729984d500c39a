//! Inline button taps: navigation and the inert page indicator.

use shelfbot_core::pagination::NAV_PREFIX;
use shelfbot_telegram::types::{AnswerCallbackQuery, CallbackQuery, SendMessage};

use super::{reply, touch_user, user_ref};
use crate::error::BotResult;
use crate::render::{self, GENERIC_FAILURE, NOOP, UNKNOWN_ACTION};
use crate::state::AppState;

#[derive(Debug, PartialEq, Eq)]
pub enum CallbackAction<'a> {
    Noop,
    Navigate(&'a str),
    Unknown,
}

impl<'a> CallbackAction<'a> {
    pub fn parse(data: Option<&'a str>) -> Self {
        match data {
            Some(NOOP) => CallbackAction::Noop,
            Some(token) if token.starts_with(NAV_PREFIX) => CallbackAction::Navigate(token),
            _ => CallbackAction::Unknown,
        }
    }
}

pub async fn handle(state: &AppState, query: CallbackQuery) -> BotResult<()> {
    let token = match CallbackAction::parse(query.data.as_deref()) {
        CallbackAction::Noop => {
            state
                .api
                .answer_callback_query(&AnswerCallbackQuery::ack(&query.id))
                .await?;
            return Ok(());
        }
        CallbackAction::Unknown => {
            state
                .api
                .answer_callback_query(&AnswerCallbackQuery::alert(&query.id, UNKNOWN_ACTION))
                .await?;
            return Ok(());
        }
        CallbackAction::Navigate(token) => token,
    };

    let user = user_ref(&query.from);
    touch_user(state, &user).await;
    // Inline keyboards live in the bot's private chat with the user.
    let chat_id = query
        .message
        .as_ref()
        .map_or(query.from.id, |message| message.chat.id);

    match state.orchestrator.navigate(&user, chat_id, token).await {
        Ok(outcome) => {
            answer(state, &render::callback_answer(&query.id, &outcome)).await;
            reply(state, chat_id, &outcome, true).await
        }
        Err(e) => {
            tracing::error!(user_id = user.id, error = %e, "Navigation failed");
            answer(state, &AnswerCallbackQuery::alert(&query.id, GENERIC_FAILURE)).await;
            state
                .api
                .send_message(&SendMessage::text(chat_id, GENERIC_FAILURE))
                .await?;
            Ok(())
        }
    }
}

/// Answer the callback after a navigation. Telegram refuses answers to
/// queries older than about 15 seconds, and a slow delivery can cross that,
/// so a rejected answer must not stop the chat reply.
async fn answer(state: &AppState, query_answer: &AnswerCallbackQuery) {
    if let Err(e) = state.api.answer_callback_query(query_answer).await {
        tracing::warn!(
            callback_id = %query_answer.callback_query_id,
            error = %e,
            "Failed to answer callback",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_actions() {
        assert_eq!(CallbackAction::parse(Some("noop")), CallbackAction::Noop);
        assert_eq!(
            CallbackAction::parse(Some("nAbC")),
            CallbackAction::Navigate("nAbC")
        );
        assert_eq!(CallbackAction::parse(Some("buy_vip")), CallbackAction::Unknown);
        assert_eq!(CallbackAction::parse(None), CallbackAction::Unknown);
    }
}
