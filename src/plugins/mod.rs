//! Plugin system for command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding the command to `Command` and `handle_command()`

pub mod filters;
pub mod start;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::events::log_failed_event;

/// All bot commands.
///
/// Every variant takes the raw argument string so stray arguments never turn
/// a known command into an unparsed message.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start(String),

    #[command(description = "Reply to a message with /filterr <trigger> to add a filter")]
    Filterr(String),

    #[command(description = "Remove all filters")]
    Stopalll(String),

    #[command(description = "List active filters")]
    List(String),
}

/// Build the command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    teloxide::filter_command::<Command, _>().endpoint(handle_command)
}

/// Run one command. Errors are logged with the message and swallowed.
async fn handle_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    cmd: Command,
) -> anyhow::Result<()> {
    let result = match cmd {
        Command::Start(_) => start::start_handler(&bot, &msg).await,
        Command::Filterr(args) => filters::filterr_command(&bot, &msg, &state, &args).await,
        Command::Stopalll(_) => filters::stopall_command(&bot, &msg, &state).await,
        Command::List(_) => filters::list_command(&bot, &msg, &state).await,
    };

    if let Err(e) = result {
        log_failed_event(&msg, &e);
    }

    Ok(())
}
