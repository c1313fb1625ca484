//! Button setup event handler.
//!
//! While a user is in setup mode every text message they send is button
//! input of the form `Label - URL`, or `done` to finish.

use teloxide::prelude::*;
use teloxide::types::{ReplyParameters, UserId};
use tracing::{debug, info};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::error::FilterError;

/// Separator between button label and URL.
const BUTTON_SEPARATOR: &str = " - ";

/// A parsed line of button input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonInput {
    Done,
    Button { label: String, url: String },
}

/// Result of applying one line of button input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupProgress {
    /// User sent "done" and is back to idle.
    Finished,
    /// Button appended; user stays in setup mode.
    ButtonAdded { label: String },
}

impl SetupProgress {
    /// Reply shown to the user.
    pub fn reply_text(&self) -> String {
        match self {
            Self::Finished => "Button setup completed!".to_string(),
            Self::ButtonAdded { label } => {
                format!("✅ Button \"{label}\" added! Send more buttons or \"done\" to finish.")
            }
        }
    }
}

/// Handle one message from a user in setup mode.
pub async fn handle_button_input(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
    user_id: UserId,
    trigger: &str,
    text: &str,
) -> anyhow::Result<()> {
    let reply = match apply_button_input(state, user_id, trigger, text) {
        Ok(progress) => progress.reply_text(),
        Err(e) => {
            debug!("Button input rejected for user {}: {:?}", user_id, e);
            e.to_string()
        }
    };

    bot.send_message(msg.chat.id, reply)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

/// Parse a line of button input.
///
/// The line is trimmed, then split on the first `" - "`.
pub fn parse_button_line(text: &str) -> Result<ButtonInput, FilterError> {
    let text = text.trim();

    if text.eq_ignore_ascii_case("done") {
        return Ok(ButtonInput::Done);
    }

    let (label, url) = text
        .split_once(BUTTON_SEPARATOR)
        .ok_or(FilterError::InvalidButtonFormat)?;

    Ok(ButtonInput::Button {
        label: label.trim().to_string(),
        url: url.trim().to_string(),
    })
}

/// Apply one line of button input to the user's filter.
///
/// A filter that disappeared since setup started (e.g. after /stopalll)
/// ends the setup with [`FilterError::DanglingFilterReference`].
pub fn apply_button_input(
    state: &AppState,
    user_id: UserId,
    trigger: &str,
    text: &str,
) -> Result<SetupProgress, FilterError> {
    let input = match parse_button_line(text) {
        Ok(input) => input,
        Err(e) => {
            // Still a setup interaction: the user is told to keep going.
            state.setup.touch(user_id);
            return Err(e);
        }
    };

    match input {
        ButtonInput::Done => {
            state.setup.exit(user_id);
            info!("User {} finished button setup for '{}'", user_id, trigger);
            Ok(SetupProgress::Finished)
        }
        ButtonInput::Button { label, url } => {
            match state.filters.append_button(trigger, &label, &url) {
                Ok(_) => {
                    state.setup.touch(user_id);
                    Ok(SetupProgress::ButtonAdded { label })
                }
                Err(FilterError::NotFound(_)) => {
                    state.setup.exit(user_id);
                    Err(FilterError::DanglingFilterReference)
                }
                Err(e) => Err(e),
            }
        }
    }
}
