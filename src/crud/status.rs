//! Transient status banners
//!
//! One success slot and one error slot. A new message replaces the old one
//! in its slot. Expiry is driven by `tick(now)` so callers own the clock.

use std::time::{Duration, Instant};

/// How long banners stay up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTimeouts {
    pub success: Duration,
    /// `None` keeps errors until the next user action
    pub error: Option<Duration>,
}

impl Default for StatusTimeouts {
    fn default() -> Self {
        Self {
            success: Duration::from_millis(3000),
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    expires_at: Option<Instant>,
}

impl StatusMessage {
    fn new(text: impl Into<String>, now: Instant, ttl: Option<Duration>) -> Self {
        Self {
            text: text.into(),
            expires_at: ttl.map(|ttl| now + ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    timeouts: StatusTimeouts,
    success: Option<StatusMessage>,
    error: Option<StatusMessage>,
}

impl StatusBoard {
    pub fn new(timeouts: StatusTimeouts) -> Self {
        Self {
            timeouts,
            success: None,
            error: None,
        }
    }

    pub fn success(&mut self, text: impl Into<String>, now: Instant) {
        self.success = Some(StatusMessage::new(text, now, Some(self.timeouts.success)));
    }

    pub fn error(&mut self, text: impl Into<String>, now: Instant) {
        self.error = Some(StatusMessage::new(text, now, self.timeouts.error));
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn clear(&mut self) {
        self.success = None;
        self.error = None;
    }

    /// Drop expired messages. Returns true if anything was removed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.success.as_ref().is_some_and(|m| m.is_expired(now)) {
            self.success = None;
            changed = true;
        }
        if self.error.as_ref().is_some_and(|m| m.is_expired(now)) {
            self.error = None;
            changed = true;
        }
        changed
    }

    pub fn success_text(&self) -> Option<&str> {
        self.success.as_ref().map(|m| m.text.as_str())
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error.as_ref().map(|m| m.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_expires_error_persists_by_default() {
        let t0 = Instant::now();
        let mut board = StatusBoard::new(StatusTimeouts::default());
        board.success("saved", t0);
        board.error("Failed to fetch PACs", t0);

        assert!(!board.tick(t0 + Duration::from_millis(2999)));
        assert_eq!(board.success_text(), Some("saved"));

        assert!(board.tick(t0 + Duration::from_secs(3)));
        assert_eq!(board.success_text(), None);
        assert_eq!(board.error_text(), Some("Failed to fetch PACs"));

        board.tick(t0 + Duration::from_secs(3600));
        assert!(board.error_text().is_some());
    }

    #[test]
    fn newer_message_replaces_and_restarts_timer() {
        let t0 = Instant::now();
        let mut board = StatusBoard::new(StatusTimeouts::default());
        board.success("first", t0);
        board.success("second", t0 + Duration::from_secs(2));

        board.tick(t0 + Duration::from_secs(4));
        assert_eq!(board.success_text(), Some("second"));
        board.tick(t0 + Duration::from_secs(5));
        assert_eq!(board.success_text(), None);
    }

    #[test]
    fn error_timeout_can_be_configured() {
        let t0 = Instant::now();
        let mut board = StatusBoard::new(StatusTimeouts {
            success: Duration::from_secs(2),
            error: Some(Duration::from_secs(3)),
        });
        board.error("boom", t0);
        board.tick(t0 + Duration::from_secs(3));
        assert_eq!(board.error_text(), None);
    }
}
