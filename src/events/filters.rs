//! Filter event handler.
//!
//! Checks incoming messages against the registered triggers and sends the
//! reply of the first filter that matches.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ReplyParameters};
use tracing::{debug, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::store::{Filter, InlineButton};

/// Check a message against the filters and reply on a match.
pub async fn check_filters(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
    text: &str,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;

    if state.filters.is_empty() {
        return Ok(());
    }

    debug!("Checking {} filters in chat {}", state.filters.len(), chat_id);

    let filter = match state.filters.find_match(text) {
        Some(f) => f,
        None => return Ok(()),
    };

    debug!("Filter match: '{}' in chat {}", filter.trigger, chat_id);

    send_filter_response(bot, chat_id, msg, &filter).await
}

/// Send the filter response.
async fn send_filter_response(
    bot: &ThrottledBot,
    chat_id: ChatId,
    msg: &Message,
    filter: &Filter,
) -> anyhow::Result<()> {
    let mut req = bot
        .send_message(chat_id, &filter.reply)
        .reply_parameters(ReplyParameters::new(msg.id));

    if let Some(keyboard) = build_keyboard(&filter.buttons) {
        req = req.reply_markup(keyboard);
    }

    req.await?;

    Ok(())
}

/// One URL button per row, in stored order.
///
/// Buttons whose URL does not parse are left out; `None` when nothing is left.
pub fn build_keyboard(buttons: &[InlineButton]) -> Option<InlineKeyboardMarkup> {
    let rows: Vec<Vec<InlineKeyboardButton>> = buttons
        .iter()
        .filter_map(|btn| match btn.url.parse() {
            Ok(url) => Some(vec![InlineKeyboardButton::url(btn.text.clone(), url)]),
            Err(e) => {
                warn!("Skipping button '{}' with invalid URL '{}': {}", btn.text, btn.url, e);
                None
            }
        })
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(InlineKeyboardMarkup::new(rows))
    }
}
