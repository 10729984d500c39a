//! Update handlers.
//!
//! Each update runs in its own task under a deadline. Failures are logged
//! here; the handlers themselves already told the user what they could.

pub mod callback;
pub mod start;

use std::time::Duration;

use shelfbot_core::entitlement::{DenyReason, UserRef};
use shelfbot_core::orchestrator::Outcome;
use shelfbot_db::repositories::{UserRepo, VipPlanRepo};
use shelfbot_telegram::types::{AnswerCallbackQuery, SendMessage, Update, User};

use crate::error::{BotError, BotResult};
use crate::render;
use crate::state::AppState;

/// Handle one update within the configured deadline.
///
/// A handler that overruns is dropped and the user gets the generic
/// failure reply instead.
pub async fn handle_update(state: AppState, update: Update) {
    let limit = Duration::from_secs(state.config.handler_timeout_secs);
    let update_id = update.update_id;
    let origin = Origin::of(&update);

    let result = match tokio::time::timeout(limit, route(&state, update)).await {
        Ok(result) => result,
        Err(_) => {
            notify_failure(&state, &origin).await;
            Err(BotError::Timeout(limit))
        }
    };

    if let Err(e) = result {
        tracing::error!(update_id, error = %e, "Update handling failed");
    }
}

/// Where an update came from, kept for replies after the handler is gone.
#[derive(Debug, Default, PartialEq, Eq)]
struct Origin {
    chat_id: Option<i64>,
    callback_id: Option<String>,
}

impl Origin {
    fn of(update: &Update) -> Self {
        if let Some(query) = &update.callback_query {
            return Self {
                chat_id: Some(query.message.as_ref().map_or(query.from.id, |m| m.chat.id)),
                callback_id: Some(query.id.clone()),
            };
        }
        Self {
            chat_id: update.message.as_ref().map(|m| m.chat.id),
            callback_id: None,
        }
    }
}

async fn notify_failure(state: &AppState, origin: &Origin) {
    if let Some(id) = &origin.callback_id {
        let answer = AnswerCallbackQuery::alert(id, render::GENERIC_FAILURE);
        if let Err(e) = state.api.answer_callback_query(&answer).await {
            tracing::warn!(error = %e, "Failed to answer timed out callback");
        }
    }
    if let Some(chat_id) = origin.chat_id {
        let message = SendMessage::text(chat_id, render::GENERIC_FAILURE);
        if let Err(e) = state.api.send_message(&message).await {
            tracing::warn!(chat_id, error = %e, "Failed to send timeout notice");
        }
    }
}

async fn route(state: &AppState, update: Update) -> BotResult<()> {
    if let Some(query) = update.callback_query {
        return callback::handle(state, query).await;
    }
    if let Some(message) = update.message {
        return start::handle(state, message).await;
    }
    Ok(())
}

pub(crate) fn user_ref(user: &User) -> UserRef {
    UserRef {
        id: user.id,
        first_name: Some(user.first_name.clone()),
        username: user.username.clone(),
    }
}

/// Record the user on first contact. Failure is not fatal; authorization
/// retries the same upsert and reports storage errors on its own.
pub(crate) async fn touch_user(state: &AppState, user: &UserRef) {
    if let Err(e) = UserRepo::ensure(&state.pool, user).await {
        tracing::warn!(user_id = user.id, error = %e, "Failed to record user");
    }
}

/// Send the chat message for `outcome`, if it has one.
pub(crate) async fn reply(
    state: &AppState,
    chat_id: i64,
    outcome: &Outcome,
    from_callback: bool,
) -> BotResult<()> {
    let plans = if matches!(outcome, Outcome::Denied(DenyReason::UpgradeRequired)) {
        VipPlanRepo::list_active(&state.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to load VIP plans");
                Vec::new()
            })
    } else {
        Vec::new()
    };

    let message = render::outcome_message(
        chat_id,
        outcome,
        &plans,
        state.config.vip_recharge_url.as_deref(),
        from_callback,
    );
    if let Some(message) = message {
        state.api.send_message(&message).await?;
    }
    Ok(())
}
