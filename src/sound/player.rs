//! Tone player implementation using rodio.
//!
//! Tones are synthesized as sine waves, so no sound files are needed.

use std::sync::Arc;

use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::tone::Tone;

/// A tone player that uses rodio for audio output.
///
/// Playback is non-blocking; each tone plays on its own detached sink, so a
/// delayed tone keeps playing after the call returns.
pub struct RodioTonePlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioTonePlayer {
    /// Opens the default audio output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays a single tone in the background.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::StreamError` if a sink cannot be created.
    pub fn play(&self, tone: &Tone) -> Result<(), SoundError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        let source = SineWave::new(tone.frequency_hz)
            .take_duration(tone.duration)
            .amplify(tone.amplitude)
            .delay(tone.delay);

        sink.append(source);
        sink.detach();

        debug!(
            frequency_hz = tone.frequency_hz,
            delay_ms = tone.delay.as_millis() as u64,
            "Tone playback started (detached)"
        );
        Ok(())
    }
}

impl std::fmt::Debug for RodioTonePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioTonePlayer").finish_non_exhaustive()
    }
}

/// Creates a tone player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player() -> Option<Arc<RodioTonePlayer>> {
    match RodioTonePlayer::new() {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, tones disabled: {}", e);
            None
        }
    }
}
