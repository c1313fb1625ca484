//! Error types.
//!
//! `FilterError` values are reported back to the user who caused them, so
//! their `Display` text is the chat reply. `ConfigError` is fatal at startup.

/// Failures of the filter commands and the button-setup flow.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("You need to reply to a message to set a filter!")]
    MissingReplyTarget,

    #[error("The message you replied to has no text to use as a filter reply!")]
    MissingReplyText,

    #[error("Please provide a trigger word!\nUsage: /filterr trigger_word")]
    MissingArgument,

    #[error("Invalid format. Please use: Button Name - URL")]
    InvalidButtonFormat,

    #[error("Error: Filter not found. Please start over with /filterr")]
    DanglingFilterReference,

    #[error("Filter \"{0}\" not found.")]
    NotFound(String),

    #[error("Trigger cannot be used: {0}")]
    InvalidTrigger(#[from] regex::Error),
}

/// Invalid or missing environment configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("WEBHOOK_PORT and PORT must differ (both are {0})")]
    PortConflict(u16),
}
