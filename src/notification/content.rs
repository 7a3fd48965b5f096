//! Notification content construction.

use crate::types::TimerMode;

/// Title and body of a desktop notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    /// Creates notification content from a title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Creates the notification announcing that `completed` has finished.
#[must_use]
pub fn completion_message(completed: TimerMode) -> NotificationContent {
    let body = match completed {
        TimerMode::Work => "Time for a break!",
        TimerMode::ShortBreak | TimerMode::LongBreak => "Ready to focus?",
    };
    NotificationContent::new(format!("{} Complete!", completed.label()), body)
}
