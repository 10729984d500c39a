//! Turns orchestrator outcomes into Bot API messages.
//!
//! Everything here is pure so replies can be tested without a network.

use shelfbot_core::entitlement::DenyReason;
use shelfbot_core::orchestrator::{Outcome, ServedPage};
use shelfbot_core::pagination::NavToken;
use shelfbot_db::models::vip_plan::VipPlan;
use shelfbot_telegram::types::{
    AnswerCallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, SendMessage,
};

/// Callback data of the inert page indicator button.
pub const NOOP: &str = "noop";

pub const WELCOME: &str = "👋 Open a resource link to start reading.";
pub const NOT_FOUND: &str = "This resource does not exist or has been removed.";
pub const BLOCKED: &str = "🚫 Your account has been restricted.";
pub const DISPATCH_FAILED: &str = "⚠️ Delivery failed, please try again later.";
pub const GENERIC_FAILURE: &str = "⚠️ Something went wrong, please try again later.";
pub const UNKNOWN_ACTION: &str = "Unknown action";
const UPGRADE_ALERT: &str = "Please become a VIP member first";

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// The chat message for an outcome.
///
/// Returns `None` when the outcome needs no chat message, which is the case
/// for a missing resource reached through a navigation button: the callback
/// alert already says so.
pub fn outcome_message(
    chat_id: i64,
    outcome: &Outcome,
    plans: &[VipPlan],
    recharge_url: Option<&str>,
    from_callback: bool,
) -> Option<SendMessage> {
    let message = match outcome {
        Outcome::Served(page) => page_caption(chat_id, page),
        Outcome::Linked { kind, title, url } => {
            let text = format!("📖 <b>{}</b>\n🏷 {}", escape_html(title), kind);
            let keyboard = url
                .as_deref()
                .map(|url| InlineKeyboardMarkup::single_row(vec![InlineKeyboardButton::url("🔗 Open", url)]));
            SendMessage::html(chat_id, text).with_keyboard(keyboard)
        }
        Outcome::NotFound if from_callback => return None,
        Outcome::NotFound => SendMessage::text(chat_id, NOT_FOUND),
        Outcome::Denied(DenyReason::Blocked) => SendMessage::text(chat_id, BLOCKED),
        Outcome::Denied(DenyReason::UpgradeRequired) => upgrade_prompt(chat_id, plans, recharge_url),
        Outcome::Empty { title } => SendMessage::html(
            chat_id,
            format!("📖 <b>{}</b> has no images yet.", escape_html(title)),
        ),
        Outcome::DispatchFailed => SendMessage::text(chat_id, DISPATCH_FAILED),
    };
    Some(message)
}

/// The answer for the callback query that produced `outcome`.
pub fn callback_answer(query_id: &str, outcome: &Outcome) -> AnswerCallbackQuery {
    match outcome {
        Outcome::NotFound => AnswerCallbackQuery::alert(query_id, NOT_FOUND),
        Outcome::Denied(DenyReason::Blocked) => AnswerCallbackQuery::alert(query_id, BLOCKED),
        Outcome::Denied(DenyReason::UpgradeRequired) => {
            AnswerCallbackQuery::alert(query_id, UPGRADE_ALERT)
        }
        Outcome::DispatchFailed => AnswerCallbackQuery::alert(query_id, DISPATCH_FAILED),
        Outcome::Served(_) | Outcome::Linked { .. } | Outcome::Empty { .. } => {
            AnswerCallbackQuery::ack(query_id)
        }
    }
}

/// Caption sent after a page's images, with navigation when there is
/// more than one page.
pub fn page_caption(chat_id: i64, page: &ServedPage) -> SendMessage {
    let mut text = format!(
        "📖 <b>{}</b>\n📊 Images: {}",
        escape_html(&page.title),
        page.item_count
    );
    if page.is_single_page() {
        return SendMessage::html(chat_id, text);
    }
    text.push_str(&format!("\n📄 Page {} / {}", page.page + 1, page.page_count));
    SendMessage::html(chat_id, text).with_keyboard(Some(nav_keyboard(page)))
}

/// `⬅️ Prev`, inert `p / n` indicator, `Next ➡️`; arrows only where a
/// neighbouring page exists.
pub fn nav_keyboard(page: &ServedPage) -> InlineKeyboardMarkup {
    let mut row = Vec::with_capacity(3);
    if let Some(prev) = page.prev() {
        row.push(nav_button("⬅️ Prev", prev));
    }
    row.push(InlineKeyboardButton::callback(
        format!("{} / {}", page.page + 1, page.page_count),
        NOOP,
    ));
    if let Some(next) = page.next() {
        row.push(nav_button("Next ➡️", next));
    }
    InlineKeyboardMarkup::single_row(row)
}

fn nav_button(label: &str, token: NavToken) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, token.encode())
}

/// Prompt listing active VIP plans and, when configured, a recharge link.
pub fn upgrade_prompt(chat_id: i64, plans: &[VipPlan], recharge_url: Option<&str>) -> SendMessage {
    let mut text = String::from("🔒 This content is for VIP members only.\n");

    if !plans.is_empty() {
        text.push_str("\n💰 <b>VIP plans:</b>\n");
        for plan in plans {
            text.push_str(&format!(
                "• {}: {} ({} days)\n",
                escape_html(&plan.name),
                escape_html(&plan.price),
                plan.duration_days
            ));
        }
    }

    let keyboard = recharge_url.map(|url| {
        text.push_str("\nTap below to become a VIP member.");
        InlineKeyboardMarkup::single_row(vec![InlineKeyboardButton::url("💎 Become VIP", url)])
    });

    SendMessage::html(chat_id, text).with_keyboard(keyboard)
}
