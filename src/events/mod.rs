//! Event handler system.
//!
//! Non-command text messages either feed an unfinished button setup or are
//! checked against the registered filters.

pub mod filters;
pub mod setup;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::UserId;
use tracing::{debug, error};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::store::SetupState;

/// Build the message event handler.
pub fn message_event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message| {
        // Commands are handled (or ignored) by the command handler
        msg.text().map(|t| !t.starts_with('/')).unwrap_or(false)
    })
    .endpoint(unified_message_handler)
}

/// Route a text message by the sender's setup state.
async fn unified_message_handler(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let text = msg.text().unwrap_or("");
    let route = route_text(&state, msg.from.as_ref().map(|u| u.id));

    debug!(
        "unified_message_handler: chat={}, text='{}', route={:?}",
        msg.chat.id,
        text.chars().take(30).collect::<String>(),
        route
    );

    let result = match route {
        TextRoute::ButtonInput { user_id, trigger } => {
            setup::handle_button_input(&bot, &msg, &state, user_id, &trigger, text).await
        }
        TextRoute::MatchFilters => filters::check_filters(&bot, &msg, &state, text).await,
    };

    if let Err(e) = result {
        log_failed_event(&msg, &e);
    }

    Ok(())
}

/// Where a non-command text message goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRoute {
    /// Sender is adding buttons; the text is never matched against filters.
    ButtonInput { user_id: UserId, trigger: String },
    /// Check the text against the registered triggers.
    MatchFilters,
}

/// Pick the route for a text message from the sender's setup state.
pub fn route_text(state: &AppState, user_id: Option<UserId>) -> TextRoute {
    let Some(user_id) = user_id else {
        return TextRoute::MatchFilters;
    };

    match state.setup.state(user_id) {
        SetupState::AwaitingButtons { trigger } => TextRoute::ButtonInput { user_id, trigger },
        SetupState::Idle => TextRoute::MatchFilters,
    }
}

/// Log a failed event with enough context to find the message again.
pub fn log_failed_event(msg: &Message, err: &anyhow::Error) {
    error!(
        chat_id = %msg.chat.id,
        message_id = msg.id.0,
        user_id = ?msg.from.as_ref().map(|u| u.id.0),
        text = msg.text().unwrap_or(""),
        "Update caused error: {:#}",
        err
    );
}
