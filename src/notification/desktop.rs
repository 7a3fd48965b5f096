//! Desktop notifications via `notify-rust`.

use std::sync::atomic::{AtomicBool, Ordering};

use notify_rust::Notification;
use tracing::debug;

use super::content::NotificationContent;
use super::error::NotificationError;
use super::{NotificationPermission, Notifier};

/// Application name shown by the notification service.
pub const APP_NAME: &str = "pomoflow";

/// Sends notifications through the platform notification service.
///
/// Desktop notification services do not gate senders, so a permission
/// request is granted locally. The permission state still follows the
/// request-once protocol of [`Notifier`].
///
/// `show` is a blocking round trip to the notification service (D-Bus on
/// Linux); callers on an async runtime should run it on a blocking thread.
#[derive(Debug, Default)]
pub struct DesktopNotifier {
    granted: AtomicBool,
}

impl DesktopNotifier {
    /// Creates a notifier that has not asked for permission yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> NotificationPermission {
        if self.granted.load(Ordering::SeqCst) {
            NotificationPermission::Granted
        } else {
            NotificationPermission::Default
        }
    }

    fn request_permission(&self) -> Result<NotificationPermission, NotificationError> {
        if !self.granted.swap(true, Ordering::SeqCst) {
            debug!("Desktop notification permission granted");
        }
        Ok(NotificationPermission::Granted)
    }

    fn show(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        Notification::new()
            .summary(&content.title)
            .body(&content.body)
            .appname(APP_NAME)
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}
