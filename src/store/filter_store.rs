//! Filter store.
//!
//! Filters are kept in registration order, which is also the order in which
//! triggers are tried against a message: the first match wins.

use std::sync::Arc;

use parking_lot::RwLock;

use super::{Filter, InlineButton};
use crate::error::FilterError;

/// Trigger with its button count, as shown by `/list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSummary {
    pub trigger: String,
    pub button_count: usize,
}

/// Shared in-memory filter store.
///
/// Cloning is cheap and every clone sees the same filters.
#[derive(Clone, Default)]
pub struct FilterStore {
    filters: Arc<RwLock<Vec<Filter>>>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a filter. Replacing resets its buttons and moves it
    /// to the end of the match order.
    ///
    /// Returns the stored (lowercase) trigger.
    pub fn set(&self, trigger: &str, reply: &str) -> Result<String, FilterError> {
        let filter = Filter::new(trigger, reply)?;
        let trigger = filter.trigger.clone();

        let mut filters = self.filters.write();
        filters.retain(|f| f.trigger != trigger);
        filters.push(filter);

        Ok(trigger)
    }

    /// Append a button to an existing filter.
    ///
    /// Returns the filter's button count after the append.
    pub fn append_button(&self, trigger: &str, label: &str, url: &str) -> Result<usize, FilterError> {
        let mut filters = self.filters.write();
        let filter = filters
            .iter_mut()
            .find(|f| f.trigger == trigger)
            .ok_or_else(|| FilterError::NotFound(trigger.to_string()))?;

        filter.buttons.push(InlineButton::new(label, url));
        Ok(filter.buttons.len())
    }

    /// Remove every filter. Returns how many were removed.
    pub fn clear_all(&self) -> usize {
        let mut filters = self.filters.write();
        let count = filters.len();
        filters.clear();
        count
    }

    /// All triggers with their button counts, in match order.
    pub fn list(&self) -> Vec<FilterSummary> {
        self.filters
            .read()
            .iter()
            .map(|f| FilterSummary {
                trigger: f.trigger.clone(),
                button_count: f.buttons.len(),
            })
            .collect()
    }

    /// Find the first filter whose trigger appears in `message` as a whole word.
    pub fn find_match(&self, message: &str) -> Option<Filter> {
        self.filters
            .read()
            .iter()
            .find(|f| f.matches(message))
            .cloned()
    }

    /// Get a filter by trigger.
    pub fn get(&self, trigger: &str) -> Option<Filter> {
        let trigger_lower = trigger.to_lowercase();
        self.filters
            .read()
            .iter()
            .find(|f| f.trigger == trigger_lower)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.filters.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let store = FilterStore::new();
        let trigger = store.set("Hello", "Hi there").unwrap();

        assert_eq!(trigger, "hello");
        let filter = store.get("HELLO").unwrap();
        assert_eq!(filter.reply, "Hi there");
        assert!(filter.buttons.is_empty());
    }

    #[test]
    fn test_replace_resets_buttons() {
        let store = FilterStore::new();
        store.set("sale", "old").unwrap();
        store.append_button("sale", "A", "http://a.com").unwrap();

        store.set("sale", "new").unwrap();

        let filter = store.get("sale").unwrap();
        assert_eq!(filter.reply, "new");
        assert!(filter.buttons.is_empty());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_append_button_keeps_order() {
        let store = FilterStore::new();
        store.set("links", "see").unwrap();

        assert_eq!(store.append_button("links", "First", "http://1").unwrap(), 1);
        assert_eq!(store.append_button("links", "Second", "http://2").unwrap(), 2);

        let buttons = store.get("links").unwrap().buttons;
        assert_eq!(buttons[0], InlineButton::new("First", "http://1"));
        assert_eq!(buttons[1], InlineButton::new("Second", "http://2"));
    }

    #[test]
    fn test_append_button_missing_trigger() {
        let store = FilterStore::new();
        let err = store.append_button("ghost", "A", "http://a").unwrap_err();
        assert!(matches!(err, FilterError::NotFound(t) if t == "ghost"));
    }

    #[test]
    fn test_clear_all_returns_count() {
        let store = FilterStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("c", "3").unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.clear_all(), 3);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert!(store.list().is_empty());
        assert_eq!(store.clear_all(), 0);
    }

    #[test]
    fn test_list_reports_button_counts() {
        let store = FilterStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.append_button("b", "x", "http://x").unwrap();

        assert_eq!(
            store.list(),
            vec![
                FilterSummary { trigger: "a".into(), button_count: 0 },
                FilterSummary { trigger: "b".into(), button_count: 1 },
            ]
        );
    }

    #[test]
    fn test_first_match_wins_in_registration_order() {
        let store = FilterStore::new();
        store.set("big", "first").unwrap();
        store.set("sale", "second").unwrap();

        assert_eq!(store.find_match("big sale today").unwrap().reply, "first");

        // Re-registering moves the trigger to the back.
        store.set("big", "again").unwrap();
        assert_eq!(store.find_match("big sale today").unwrap().reply, "second");
    }

    #[test]
    fn test_find_match_requires_whole_word() {
        let store = FilterStore::new();
        store.set("sale", "50% off!").unwrap();

        assert!(store.find_match("Big SALE today").is_some());
        assert!(store.find_match("salesforce").is_none());
        assert!(store.find_match("nothing here").is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = FilterStore::new();
        let other = store.clone();
        store.set("shared", "yes").unwrap();

        assert!(other.get("shared").is_some());
    }
}
