//! Transient notifications (toasts).
//!
//! Notifications expire after a number of [`crate::AppEvent::Tick`]s. Errors
//! stay on screen twice as long as successes.

use std::time::Duration;

/// Interval between [`crate::AppEvent::Tick`] events.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Ticks a success notification stays visible (2 seconds).
pub const SUCCESS_TTL_TICKS: u32 = 20;

/// Ticks an error notification stays visible (4 seconds).
pub const ERROR_TTL_TICKS: u32 = 40;

/// Upper bound on simultaneously visible notifications. Oldest are dropped.
const MAX_VISIBLE: usize = 5;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// A single toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Text shown to the user.
    pub text: String,
    /// Ticks until expiry.
    pub remaining: u32,
}

/// Visible notifications, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a success notification.
    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NotificationKind::Success, text.into(), SUCCESS_TTL_TICKS);
    }

    /// Show an error notification.
    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NotificationKind::Error, text.into(), ERROR_TTL_TICKS);
    }

    fn push(&mut self, kind: NotificationKind, text: String, remaining: u32) {
        self.items.push(Notification { kind, text, remaining });
        if self.items.len() > MAX_VISIBLE {
            let excess = self.items.len() - MAX_VISIBLE;
            self.items.drain(..excess);
        }
    }

    /// Advance one tick. Returns true if any notification expired.
    pub fn tick(&mut self) -> bool {
        let before = self.items.len();
        for item in &mut self.items {
            item.remaining = item.remaining.saturating_sub(1);
        }
        self.items.retain(|item| item.remaining > 0);
        self.items.len() != before
    }

    /// Visible notifications, oldest first.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Most recent notification.
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// True if nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
