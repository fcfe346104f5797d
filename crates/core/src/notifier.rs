use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

/// How long a notification stays up before it starts leaving.
pub const DISPLAY_DURATION: Duration = Duration::from_secs(3);
/// Length of the leave transition, identical for timeouts and explicit dismissals.
pub const LEAVE_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    shown_at: Instant,
    leaving_since: Option<Instant>,
}

impl Notification {
    pub fn is_leaving(&self) -> bool {
        self.leaving_since.is_some()
    }
}

/// Holds at most one transient message.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    current: Option<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.notify_at(message, kind, Instant::now());
    }

    pub fn notify_at(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        let message = message.into();
        debug!(kind = %kind, message = message.as_str(), "notify");
        self.current = Some(Notification {
            message,
            kind,
            shown_at: now,
            leaving_since: None,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationKind::Error);
    }

    pub fn dismiss(&mut self) {
        self.dismiss_at(Instant::now());
    }

    /// Start the leave transition early.
    pub fn dismiss_at(&mut self, now: Instant) {
        if let Some(current) = self.current.as_mut() {
            if current.leaving_since.is_none() {
                current.leaving_since = Some(now);
            }
        }
    }

    /// Advance timers: expire into the leave transition, then drop once it finishes.
    pub fn tick(&mut self, now: Instant) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        let finished = match current.leaving_since {
            Some(since) => now.saturating_duration_since(since) >= LEAVE_TRANSITION,
            None => {
                if now.saturating_duration_since(current.shown_at) >= DISPLAY_DURATION {
                    current.leaving_since = Some(now);
                }
                false
            }
        };
        if finished {
            self.current = None;
        }
    }
}
