//! Thin Telegram Bot API client.
//!
//! Covers only the methods the bot needs: long polling, plain and media
//! messages, callback answers and startup housekeeping. [`TelegramApi`]
//! also implements the core [`DeliverySink`](shelfbot_core::sink::DeliverySink)
//! seam so the dispatcher can push pages through it.

pub mod api;
pub mod error;
pub mod sink;
pub mod types;

pub use api::TelegramApi;
pub use error::TelegramError;
