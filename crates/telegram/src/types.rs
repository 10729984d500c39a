//! Wire types for the subset of the Bot API in use.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub error_code: Option<u16>,
    pub description: Option<String>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    /// Seconds to wait before repeating a flood-limited request.
    pub retry_after: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    pub fn single_row(row: Vec<InlineKeyboardButton>) -> Self {
        Self {
            inline_keyboard: vec![row],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineKeyboardButton {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            callback_data: Some(data.into()),
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            callback_data: None,
        }
    }
}

/// One photo inside a `sendMediaGroup` album, referenced by platform handle.
#[derive(Debug, Clone, Serialize)]
pub struct InputMediaPhoto<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub media: &'a str,
}

impl<'a> InputMediaPhoto<'a> {
    pub fn new(media: &'a str) -> Self {
        Self {
            kind: "photo",
            media,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkPreviewOptions {
    pub is_disabled: bool,
}

/// Parameters for `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_preview_options: Option<LinkPreviewOptions>,
}

impl SendMessage {
    /// Plain text message.
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: None,
            reply_markup: None,
            link_preview_options: None,
        }
    }

    /// HTML message with link previews turned off.
    pub fn html(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            parse_mode: Some("HTML"),
            link_preview_options: Some(LinkPreviewOptions { is_disabled: true }),
            ..Self::text(chat_id, text)
        }
    }

    pub fn with_keyboard(mut self, keyboard: Option<InlineKeyboardMarkup>) -> Self {
        self.reply_markup = keyboard;
        self
    }
}

/// Parameters for `answerCallbackQuery`.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerCallbackQuery {
    pub callback_query_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub show_alert: bool,
}

impl AnswerCallbackQuery {
    /// Silent acknowledgement that just stops the client spinner.
    pub fn ack(callback_query_id: impl Into<String>) -> Self {
        Self {
            callback_query_id: callback_query_id.into(),
            text: None,
            show_alert: false,
        }
    }

    pub fn alert(callback_query_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            callback_query_id: callback_query_id.into(),
            text: Some(text.into()),
            show_alert: true,
        }
    }
}
