//! Sound system error types.
//!
//! Every error here is swallowed by the effect dispatcher; they exist so the
//! failure can be logged with a useful message.

use thiserror::Error;

/// Errors that can occur while playing a completion tone.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no output device, headless host).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create a playback sink on the output stream.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Generic playback error.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio output device",
            Self::StreamError(_) => "check the system audio configuration",
            Self::PlaybackError(_) => "restart the timer",
        }
    }
}
