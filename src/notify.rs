//! User-visible notifications

use std::sync::Mutex;

/// Tone of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Positive,
    Negative,
}

/// A single notification shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub caption: Option<String>,
    pub kind: NotificationKind,
}

impl Notification {
    /// A negative notification with a caption
    pub fn negative(message: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            caption: Some(caption.into()),
            kind: NotificationKind::Negative,
        }
    }

    /// A positive notification without caption
    pub fn positive(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            caption: None,
            kind: NotificationKind::Positive,
        }
    }
}

/// Notification surface. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        let caption = notification.caption.as_deref().unwrap_or("");
        match notification.kind {
            NotificationKind::Positive => log::info!("{} {}", notification.message, caption),
            NotificationKind::Negative => log::error!("{} {}", notification.message, caption),
        }
    }
}

/// Keeps every notification so a UI layer (or a test) can drain them
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications raised so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Remove and return all pending notifications
    pub fn drain(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|mut list| std::mem::take(&mut *list))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        log::debug!("notification: {:?}", notification);
        if let Ok(mut list) = self.notifications.lock() {
            list.push(notification);
        }
    }
}
