//! Button setup tracker.
//!
//! Tracks which users are adding buttons to a freshly registered filter.
//! The mapping is global: a user in setup mode is in it in every chat.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use teloxide::types::UserId;
use tracing::{debug, warn};

/// Per-user setup state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SetupState {
    #[default]
    Idle,
    AwaitingButtons { trigger: String },
}

/// An unfinished button setup.
#[derive(Debug, Clone)]
struct SetupSession {
    trigger: String,
    last_activity: Instant,
}

/// Global setup tracker (in-memory, lock-free).
#[derive(Clone)]
pub struct SetupTracker {
    sessions: Arc<DashMap<UserId, SetupSession>>,
    /// Idle time after which a session is dropped; `None` = never.
    timeout: Option<Duration>,
}

impl SetupTracker {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            timeout,
        }
    }

    /// Put a user into setup mode for `trigger`, replacing any unfinished setup.
    pub fn enter(&self, user_id: UserId, trigger: impl Into<String>) {
        let trigger = trigger.into();
        debug!(%user_id, %trigger, "Entering button setup");
        self.sweep_expired(Instant::now());
        self.sessions.insert(
            user_id,
            SetupSession {
                trigger,
                last_activity: Instant::now(),
            },
        );
    }

    /// Trigger the user is currently adding buttons to, if any.
    ///
    /// Expired sessions are removed here.
    pub fn active_trigger(&self, user_id: UserId) -> Option<String> {
        self.active_trigger_at(user_id, Instant::now())
    }

    fn active_trigger_at(&self, user_id: UserId, now: Instant) -> Option<String> {
        let timeout = self.timeout;
        let expired = |s: &SetupSession| {
            timeout.is_some_and(|t| now.saturating_duration_since(s.last_activity) >= t)
        };

        if let Some((_, session)) = self.sessions.remove_if(&user_id, |_, s| expired(s)) {
            warn!(%user_id, trigger = %session.trigger, "Button setup expired");
            return None;
        }

        self.sessions.get(&user_id).map(|s| s.trigger.clone())
    }

    /// Drop sessions of users who went quiet and never came back.
    fn sweep_expired(&self, now: Instant) {
        if let Some(timeout) = self.timeout {
            self.sessions.retain(|user_id, s| {
                let alive = now.saturating_duration_since(s.last_activity) < timeout;
                if !alive {
                    warn!(%user_id, trigger = %s.trigger, "Button setup expired");
                }
                alive
            });
        }
    }

    /// Current state for a user.
    pub fn state(&self, user_id: UserId) -> SetupState {
        match self.active_trigger(user_id) {
            Some(trigger) => SetupState::AwaitingButtons { trigger },
            None => SetupState::Idle,
        }
    }

    /// Record setup activity, postponing expiry.
    pub fn touch(&self, user_id: UserId) {
        if let Some(mut session) = self.sessions.get_mut(&user_id) {
            session.last_activity = Instant::now();
        }
    }

    /// Leave setup mode. Returns the trigger that was being set up.
    pub fn exit(&self, user_id: UserId) -> Option<String> {
        self.sessions.remove(&user_id).map(|(_, s)| {
            debug!(%user_id, trigger = %s.trigger, "Leaving button setup");
            s.trigger
        })
    }
}

impl Default for SetupTracker {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    #[test]
    fn test_enter_and_exit() {
        let tracker = SetupTracker::default();
        assert_eq!(tracker.state(ALICE), SetupState::Idle);

        tracker.enter(ALICE, "sale");
        assert_eq!(
            tracker.state(ALICE),
            SetupState::AwaitingButtons { trigger: "sale".into() }
        );
        assert_eq!(tracker.state(BOB), SetupState::Idle);

        assert_eq!(tracker.exit(ALICE), Some("sale".to_string()));
        assert_eq!(tracker.state(ALICE), SetupState::Idle);
        assert_eq!(tracker.exit(ALICE), None);
    }

    #[test]
    fn test_enter_overwrites_previous_setup() {
        let tracker = SetupTracker::default();
        tracker.enter(ALICE, "first");
        tracker.enter(ALICE, "second");

        assert_eq!(tracker.active_trigger(ALICE), Some("second".to_string()));
    }

    #[test]
    fn test_no_timeout_never_expires() {
        let tracker = SetupTracker::default();
        tracker.enter(ALICE, "sale");

        let much_later = Instant::now() + Duration::from_secs(365 * 24 * 3600);
        assert_eq!(tracker.active_trigger_at(ALICE, much_later), Some("sale".to_string()));
    }

    #[test]
    fn test_session_expires_after_timeout() {
        let tracker = SetupTracker::new(Some(Duration::from_secs(60)));
        tracker.enter(ALICE, "sale");

        let before = Instant::now() + Duration::from_secs(30);
        assert_eq!(tracker.active_trigger_at(ALICE, before), Some("sale".to_string()));

        let after = Instant::now() + Duration::from_secs(61);
        assert_eq!(tracker.active_trigger_at(ALICE, after), None);

        // Expired session is gone for good.
        assert_eq!(tracker.active_trigger(ALICE), None);
    }

    #[test]
    fn test_enter_sweeps_abandoned_sessions() {
        let tracker = SetupTracker::new(Some(Duration::from_millis(50)));
        tracker.enter(BOB, "old");

        std::thread::sleep(Duration::from_millis(80));
        tracker.enter(ALICE, "new");

        assert_eq!(tracker.sessions.len(), 1);
        assert!(tracker.sessions.contains_key(&ALICE));
    }

    #[test]
    fn test_sweep_keeps_sessions_without_timeout() {
        let tracker = SetupTracker::default();
        tracker.enter(BOB, "old");
        tracker.enter(ALICE, "new");

        assert_eq!(tracker.sessions.len(), 2);
    }

    #[test]
    fn test_touch_postpones_expiry() {
        let tracker = SetupTracker::new(Some(Duration::from_secs(60)));
        tracker.enter(ALICE, "sale");
        let entered = Instant::now();

        std::thread::sleep(Duration::from_millis(20));
        tracker.touch(ALICE);

        // 60s after entering but less than 60s after the touch.
        let at = entered + Duration::from_secs(60) + Duration::from_millis(5);
        assert_eq!(tracker.active_trigger_at(ALICE, at), Some("sale".to_string()));
    }
}
