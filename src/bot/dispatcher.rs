//! Message dispatcher setup.
//!
//! Builds the dispatcher with the command handlers and the text handler.

use std::time::Duration;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;

use crate::events;
use crate::plugins;
use crate::store::{FilterStore, SetupTracker};

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Dispatcher type shared by the polling and webhook runners.
pub type BotDispatcher = Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registered filters.
    pub filters: FilterStore,

    /// Users currently adding buttons to a filter.
    pub setup: SetupTracker,
}

impl AppState {
    /// Create a new application state with empty stores.
    pub fn new(setup_timeout: Option<Duration>) -> Self {
        Self {
            filters: FilterStore::new(),
            setup: SetupTracker::new(setup_timeout),
        }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(bot: ThrottledBot, state: AppState) -> BotDispatcher {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Commands first, then plain text (button setup or trigger matching)
    Update::filter_message()
        .branch(plugins::command_handler())
        .branch(events::message_event_handler())
}
