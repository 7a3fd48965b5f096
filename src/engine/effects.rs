//! Completion side effects: tones and desktop notifications.
//!
//! Both are best-effort. A failing or missing backend is logged and never
//! affects the timer state. Inside a tokio runtime the notification itself is
//! shown on the blocking pool, so a slow notification service cannot hold up
//! the engine.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::notification::{
    completion_message, NotificationContent, NotificationPermission, Notifier,
};
use crate::sound::{completion_tones, TonePlayer};
use crate::types::{Settings, TimerMode};

/// Fans out completion effects to the configured backends.
#[derive(Clone, Default)]
pub struct EffectDispatcher {
    player: Option<Arc<dyn TonePlayer>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl std::fmt::Debug for EffectDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectDispatcher")
            .field("player", &self.player.is_some())
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

impl EffectDispatcher {
    #[must_use]
    pub fn new(player: Option<Arc<dyn TonePlayer>>, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self { player, notifier }
    }

    /// A dispatcher with no backends.
    #[must_use]
    pub fn silent() -> Self {
        Self::default()
    }

    /// Announces the completion of a `completed` interval.
    pub fn dispatch_completion(&self, completed: TimerMode, settings: &Settings) {
        if settings.sound_enabled {
            self.play_tones(completed, settings.sound_volume);
        }
        if settings.notifications_enabled {
            self.notify(completed);
        }
    }

    fn play_tones(&self, completed: TimerMode, volume: f32) {
        let Some(player) = &self.player else {
            debug!("No audio output, skipping completion tones");
            return;
        };

        for tone in completion_tones(completed, volume) {
            if let Err(e) = player.play(&tone) {
                warn!("Failed to play completion tone: {} ({})", e, e.suggestion());
                break;
            }
        }
    }

    fn notify(&self, completed: TimerMode) {
        let Some(notifier) = &self.notifier else {
            return;
        };

        let permission = match notifier.permission() {
            NotificationPermission::Default => match notifier.request_permission() {
                Ok(permission) => permission,
                Err(e) => {
                    warn!("Notification permission request failed: {}", e);
                    return;
                }
            },
            permission => permission,
        };

        if permission != NotificationPermission::Granted {
            debug!(?permission, "Notifications not permitted, skipping");
            return;
        }

        let content = completion_message(completed);
        match Handle::try_current() {
            Ok(handle) => {
                let notifier = Arc::clone(notifier);
                handle.spawn_blocking(move || show_notification(notifier.as_ref(), &content));
            }
            Err(_) => show_notification(notifier.as_ref(), &content),
        }
    }
}

fn show_notification(notifier: &dyn Notifier, content: &NotificationContent) {
    if let Err(e) = notifier.show(content) {
        warn!("Failed to show notification: {} ({})", e, e.suggestion());
    }
}
