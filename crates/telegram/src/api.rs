//! HTTP client for the Telegram Bot API.
//!
//! Every method is a JSON `POST` to `{api_url}/bot{token}/{method}`. The
//! response envelope is unwrapped here so callers see either the `result`
//! payload or a [`TelegramError`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TelegramError;
use crate::types::{
    AnswerCallbackQuery, ApiResponse, InputMediaPhoto, Message, SendMessage, Update, User,
};

/// Per-request ceiling for ordinary calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra slack on top of the long-poll timeout before the HTTP call gives up.
const POLL_SLACK: Duration = Duration::from_secs(10);

/// Longest error body kept when the API returns a non-JSON page.
const MAX_ERROR_BODY: usize = 256;

/// Client bound to one bot token.
#[derive(Clone)]
pub struct TelegramApi {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramApi {
    /// * `api_url` - API root, e.g. `https://api.telegram.org`.
    pub fn new(api_url: &str, token: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, token)
    }

    /// Reuse an existing [`reqwest::Client`] connection pool.
    pub fn with_client(client: reqwest::Client, api_url: &str, token: &str) -> Self {
        Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    /// Long-poll for updates after `offset`, waiting up to `timeout` seconds.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let params = serde_json::json!({
            "offset": offset,
            "timeout": timeout,
            "allowed_updates": ["message", "callback_query"],
        });
        self.call_with_timeout(
            "getUpdates",
            &params,
            Duration::from_secs(timeout) + POLL_SLACK,
        )
        .await
    }

    pub async fn send_message(&self, message: &SendMessage) -> Result<Message, TelegramError> {
        self.call("sendMessage", message).await
    }

    /// Send photos as one album. The API rejects single-item albums, so one
    /// handle goes out through `sendPhoto` instead.
    pub async fn send_media_group(
        &self,
        chat_id: i64,
        file_ids: &[String],
    ) -> Result<Vec<Message>, TelegramError> {
        if let [single] = file_ids {
            let params = serde_json::json!({ "chat_id": chat_id, "photo": single });
            let message: Message = self.call("sendPhoto", &params).await?;
            return Ok(vec![message]);
        }

        let media: Vec<InputMediaPhoto<'_>> =
            file_ids.iter().map(|id| InputMediaPhoto::new(id)).collect();
        let params = serde_json::json!({ "chat_id": chat_id, "media": media });
        self.call("sendMediaGroup", &params).await
    }

    pub async fn answer_callback_query(
        &self,
        answer: &AnswerCallbackQuery,
    ) -> Result<bool, TelegramError> {
        self.call("answerCallbackQuery", answer).await
    }

    /// Drop any webhook so long polling can take over.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<bool, TelegramError> {
        let params = serde_json::json!({ "drop_pending_updates": drop_pending_updates });
        self.call("deleteWebhook", &params).await
    }

    /// Identify the bot; doubles as a token check at startup.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    // ---- private helpers ----

    async fn call<P, T>(&self, method: &str, params: &P) -> Result<T, TelegramError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call_with_timeout(method, params, REQUEST_TIMEOUT).await
    }

    async fn call_with_timeout<P, T>(
        &self,
        method: &str,
        params: &P,
        timeout: Duration,
    ) -> Result<T, TelegramError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .timeout(timeout)
            .json(params)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_envelope(status, &body)
    }
}

/// Unwrap the `{ok, result, ...}` envelope.
fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, TelegramError> {
    let envelope = match serde_json::from_str::<ApiResponse<T>>(body) {
        Ok(envelope) => envelope,
        Err(e) if (200..300).contains(&status) => return Err(TelegramError::Decode(e)),
        Err(_) => {
            return Err(TelegramError::Api {
                code: status,
                description: body.chars().take(MAX_ERROR_BODY).collect(),
                retry_after: None,
            })
        }
    };

    match envelope {
        ApiResponse {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        ApiResponse {
            error_code,
            description,
            parameters,
            ..
        } => Err(TelegramError::Api {
            code: error_code.unwrap_or(status),
            description: description.unwrap_or_else(|| "missing result".to_string()),
            retry_after: parameters.and_then(|p| p.retry_after),
        }),
    }
}
