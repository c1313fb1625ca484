//! Filter model for auto-reply triggers.

use regex::Regex;

use crate::error::FilterError;

/// Inline link button attached to a filter reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    /// Button label
    pub text: String,
    /// URL to open when clicked
    pub url: String,
}

impl InlineButton {
    /// Create a new inline button.
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// A registered auto-reply filter.
#[derive(Debug, Clone)]
pub struct Filter {
    /// Lowercase trigger word
    pub trigger: String,

    /// Reply text
    pub reply: String,

    /// Buttons for the reply, one per keyboard row
    pub buttons: Vec<InlineButton>,

    /// Whole-word matcher for `trigger`
    pattern: Regex,
}

impl Filter {
    /// Create a new text filter with no buttons.
    pub fn new(trigger: impl Into<String>, reply: impl Into<String>) -> Result<Self, FilterError> {
        let trigger = trigger.into().to_lowercase();
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&trigger)))?;

        Ok(Self {
            trigger,
            reply: reply.into(),
            buttons: vec![],
            pattern,
        })
    }

    /// Check if a message contains this filter's trigger as a whole word.
    ///
    /// Matching is case-insensitive: the message is lowercased before the
    /// search, the trigger is stored lowercase.
    pub fn matches(&self, message: &str) -> bool {
        self.pattern.is_match(&message.to_lowercase())
    }
}
