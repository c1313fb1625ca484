//! /start command plugin.
//!
//! Handles the /start command and sends a greeting.

use teloxide::prelude::*;
use teloxide::types::ReplyParameters;

use crate::bot::dispatcher::ThrottledBot;

const GREETING: &str = "Hi! I am your filter bot. Use /filterr to add new filters.";

/// Handle the /start command.
pub async fn start_handler(bot: &ThrottledBot, msg: &Message) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, GREETING)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}
