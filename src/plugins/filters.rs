//! Filter command handlers.
//!
//! Commands for registering and managing auto-reply filters.

use teloxide::prelude::*;
use teloxide::types::{ReplyParameters, UserId};
use tracing::{debug, info};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::error::FilterError;
use crate::store::FilterSummary;

/// Handle /filterr command - register a filter from the replied message.
///
/// Usage: reply to a message with `/filterr <trigger>`. The sender is then
/// asked for buttons until they send "done".
pub async fn filterr_command(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
    args: &str,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;

    let text = match begin_filter(msg, state, args) {
        Ok(trigger) => {
            info!("Added filter '{}' in chat {}", trigger, chat_id);
            added_text(&trigger)
        }
        Err(e) => {
            debug!("Rejected /filterr in chat {}: {:?}", chat_id, e);
            e.to_string()
        }
    };

    bot.send_message(chat_id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

/// Handle /stopalll command - remove all filters.
pub async fn stopall_command(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;

    // Users still in button setup are left alone; their next button
    // hits a missing filter and ends the setup.
    let count = state.filters.clear_all();

    let text = if count == 0 {
        "No filters to remove!".to_string()
    } else {
        info!("Cleared all {} filters (requested in chat {})", count, chat_id);
        format!("🗑️ Removed all {} filters!", count)
    };

    bot.send_message(chat_id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

/// Handle /list command - list all filters.
pub async fn list_command(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<()> {
    let text = format_filter_list(&state.filters.list());

    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

/// Text and caption of the message a /filterr command replied to.
type RepliedContent<'a> = (Option<&'a str>, Option<&'a str>);

/// Validate a /filterr message and register the filter.
fn begin_filter(msg: &Message, state: &AppState, args: &str) -> Result<String, FilterError> {
    let replied = msg.reply_to_message().map(|r| (r.text(), r.caption()));
    let (trigger, response) = validate_request(replied, args)?;

    register_filter(state, msg.from.as_ref().map(|u| u.id), trigger, response)
}

/// Check a /filterr request: reply target first, then the trigger, then
/// the replied text (caption when there is no text).
///
/// Returns `(trigger, response)`.
fn validate_request<'a>(
    replied: Option<RepliedContent<'a>>,
    args: &'a str,
) -> Result<(&'a str, &'a str), FilterError> {
    let (text, caption) = replied.ok_or(FilterError::MissingReplyTarget)?;
    let trigger = parse_trigger(args)?;
    let response = text.or(caption).ok_or(FilterError::MissingReplyText)?;

    Ok((trigger, response))
}

/// First whitespace-delimited argument of /filterr.
fn parse_trigger(args: &str) -> Result<&str, FilterError> {
    args.split_whitespace().next().ok_or(FilterError::MissingArgument)
}

/// Store the filter and move the sender into button setup.
///
/// Returns the stored (lowercase) trigger.
pub(crate) fn register_filter(
    state: &AppState,
    user_id: Option<UserId>,
    trigger: &str,
    response: &str,
) -> Result<String, FilterError> {
    if state.filters.get(trigger).is_some() {
        debug!("Replacing existing filter '{}'", trigger.to_lowercase());
    }
    let trigger = state.filters.set(trigger, response)?;

    // Messages without a sender (channel posts) can't continue a setup.
    if let Some(user_id) = user_id {
        state.setup.enter(user_id, trigger.clone());
    }

    Ok(trigger)
}

/// Confirmation and button instructions after /filterr.
fn added_text(trigger: &str) -> String {
    format!(
        "✅ Filter \"{trigger}\" added successfully!\n\n\
         Now send button information in this format:\n\
         Button Name - URL\n\
         For example:\n\
         Google - https://google.com\n\
         YouTube - https://youtube.com\n\n\
         Send \"done\" when finished adding buttons."
    )
}

/// Render the /list reply.
fn format_filter_list(filters: &[FilterSummary]) -> String {
    if filters.is_empty() {
        return "No active filters!".to_string();
    }

    let lines: Vec<String> = filters
        .iter()
        .map(|f| format!("• {} ({} buttons)", f.trigger, f.button_count))
        .collect();

    format!("Active filters:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SetupState;

    const ALICE: UserId = UserId(42);

    #[test]
    fn test_parse_trigger() {
        assert_eq!(parse_trigger("sale").unwrap(), "sale");
        assert_eq!(parse_trigger("  big sale ").unwrap(), "big");
        assert!(matches!(parse_trigger(""), Err(FilterError::MissingArgument)));
        assert!(matches!(parse_trigger("   "), Err(FilterError::MissingArgument)));
    }

    #[test]
    fn test_validate_request_order() {
        // No reply wins over a missing trigger.
        assert!(matches!(
            validate_request(None, ""),
            Err(FilterError::MissingReplyTarget)
        ));
        assert!(matches!(
            validate_request(None, "sale"),
            Err(FilterError::MissingReplyTarget)
        ));

        // Missing trigger wins over a replied message without text.
        assert!(matches!(
            validate_request(Some((None, None)), " "),
            Err(FilterError::MissingArgument)
        ));
        assert!(matches!(
            validate_request(Some((None, None)), "sale"),
            Err(FilterError::MissingReplyText)
        ));
    }

    #[test]
    fn test_validate_request_uses_caption_fallback() {
        assert_eq!(
            validate_request(Some((Some("50% off!"), Some("caption"))), "sale now").unwrap(),
            ("sale", "50% off!")
        );
        assert_eq!(
            validate_request(Some((None, Some("photo caption"))), "pic").unwrap(),
            ("pic", "photo caption")
        );
    }

    #[test]
    fn test_register_filter_enters_setup() {
        let state = AppState::new(None);
        let trigger = register_filter(&state, Some(ALICE), "SALE", "50% off!").unwrap();

        assert_eq!(trigger, "sale");
        assert_eq!(state.filters.get("sale").unwrap().reply, "50% off!");
        assert_eq!(
            state.setup.state(ALICE),
            SetupState::AwaitingButtons { trigger: "sale".into() }
        );
    }

    #[test]
    fn test_register_without_sender_skips_setup() {
        let state = AppState::new(None);
        register_filter(&state, None, "news", "Read all about it").unwrap();

        assert_eq!(state.filters.list().len(), 1);
        assert_eq!(state.setup.state(ALICE), SetupState::Idle);
    }

    #[test]
    fn test_reregister_replaces_filter() {
        let state = AppState::new(None);
        register_filter(&state, Some(ALICE), "sale", "old").unwrap();
        state.filters.append_button("sale", "A", "http://a.com").unwrap();

        register_filter(&state, Some(ALICE), "sale", "new").unwrap();

        let filter = state.filters.get("sale").unwrap();
        assert_eq!(filter.reply, "new");
        assert!(filter.buttons.is_empty());
    }

    #[test]
    fn test_format_filter_list() {
        assert_eq!(format_filter_list(&[]), "No active filters!");

        let list = vec![
            FilterSummary { trigger: "sale".into(), button_count: 1 },
            FilterSummary { trigger: "hello".into(), button_count: 0 },
        ];
        assert_eq!(
            format_filter_list(&list),
            "Active filters:\n• sale (1 buttons)\n• hello (0 buttons)"
        );
    }

    #[test]
    fn test_stopall_then_list_is_empty() {
        let state = AppState::new(None);
        register_filter(&state, Some(ALICE), "a", "1").unwrap();
        register_filter(&state, Some(ALICE), "b", "2").unwrap();

        assert_eq!(state.filters.clear_all(), 2);
        assert_eq!(format_filter_list(&state.filters.list()), "No active filters!");
    }

    #[test]
    fn test_added_text_names_trigger() {
        let text = added_text("sale");
        assert!(text.starts_with("✅ Filter \"sale\" added successfully!"));
        assert!(text.ends_with("Send \"done\" when finished adding buttons."));
    }
}
