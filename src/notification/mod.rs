//! Desktop notification support.
//!
//! This module provides:
//!
//! - A permission model (ask once, never retry after a denial)
//! - Completion message content
//! - A `notify-rust` backed notifier and a mock for tests

mod content;
mod desktop;
pub mod error;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub use self::content::{completion_message, NotificationContent};
pub use self::desktop::{DesktopNotifier, APP_NAME};
pub use self::error::NotificationError;

/// Whether the user allows notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPermission {
    /// Not asked yet
    #[default]
    Default,
    /// Notifications may be shown
    Granted,
    /// The user refused; do not ask again
    Denied,
}

/// Trait for notification backends.
///
/// Backends are shared with blocking worker threads, so they must be
/// `Send + Sync`.
pub trait Notifier: Send + Sync {
    /// Returns the current permission state.
    fn permission(&self) -> NotificationPermission;

    /// Asks the user for permission and returns the resulting state.
    ///
    /// # Errors
    ///
    /// Returns an error if the request itself fails.
    fn request_permission(&self) -> Result<NotificationPermission, NotificationError>;

    /// Shows a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    fn show(&self, content: &NotificationContent) -> Result<(), NotificationError>;
}

/// Mock notifier for testing.
#[derive(Debug)]
pub struct MockNotifier {
    permission: Mutex<NotificationPermission>,
    grant_on_request: AtomicBool,
    should_fail: AtomicBool,
    request_count: AtomicUsize,
    shown: Mutex<Vec<NotificationContent>>,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    /// Creates a mock that has not been asked yet and grants on request.
    #[must_use]
    pub fn new() -> Self {
        Self {
            permission: Mutex::new(NotificationPermission::Default),
            grant_on_request: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
            request_count: AtomicUsize::new(0),
            shown: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock with a fixed initial permission.
    #[must_use]
    pub fn with_permission(permission: NotificationPermission) -> Self {
        let mock = Self::new();
        mock.set_permission(permission);
        mock
    }

    pub fn set_permission(&self, permission: NotificationPermission) {
        *self.permission.lock().unwrap() = permission;
    }

    pub fn set_grant_on_request(&self, grant: bool) {
        self.grant_on_request.store(grant, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn shown(&self) -> Vec<NotificationContent> {
        self.shown.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    fn permission(&self) -> NotificationPermission {
        *self.permission.lock().unwrap()
    }

    fn request_permission(&self) -> Result<NotificationPermission, NotificationError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        let granted = if self.grant_on_request.load(Ordering::SeqCst) {
            NotificationPermission::Granted
        } else {
            NotificationPermission::Denied
        };
        self.set_permission(granted);
        Ok(granted)
    }

    fn show(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.shown.lock().unwrap().push(content.clone());
        Ok(())
    }
}
