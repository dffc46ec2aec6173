//! Transient notifications raised by pages and forms

use std::fmt;
use std::sync::Mutex;

/// Notification severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn new(text: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// Sink for notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn info(&self, text: &str) {
        self.notify(Notification::new(text, NotificationLevel::Info));
    }

    fn success(&self, text: &str) {
        self.notify(Notification::new(text, NotificationLevel::Success));
    }

    fn warning(&self, text: &str) {
        self.notify(Notification::new(text, NotificationLevel::Warning));
    }

    fn error(&self, text: &str) {
        self.notify(Notification::new(text, NotificationLevel::Error));
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries().pop()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(notification);
        }
    }
}
