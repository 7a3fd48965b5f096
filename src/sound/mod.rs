//! Completion tones for the interval timer.
//!
//! This module provides:
//!
//! - Tone planning per completed mode (`completion_tones`)
//! - A rodio-backed player synthesizing sine beeps
//! - A mock player for tests
//!
//! Playback is best-effort. Callers log and drop every [`SoundError`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use pomoflow::sound::{completion_tones, RodioTonePlayer};
//! use pomoflow::types::TimerMode;
//!
//! let player = RodioTonePlayer::new().expect("audio init");
//! for tone in completion_tones(TimerMode::Work, 0.5) {
//!     player.play(&tone).expect("playback failed");
//! }
//! ```

mod error;
mod player;
mod tone;

pub use error::SoundError;
pub use player::{try_create_player, RodioTonePlayer};
pub use tone::{
    completion_tones, Tone, AMPLITUDE_SCALE, BREAK_TONE_HZ, FOLLOW_UP_DELAY, TONE_DURATION,
    WORK_FOLLOW_UP_TONE_HZ, WORK_TONE_HZ,
};

/// Trait for tone playback implementations.
///
/// This trait abstracts playback so the timer can run with a real audio
/// device, a mock, or nothing at all.
pub trait TonePlayer {
    /// Plays a tone without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, tone: &Tone) -> Result<(), SoundError>;
}

impl TonePlayer for RodioTonePlayer {
    fn play(&self, tone: &Tone) -> Result<(), SoundError> {
        RodioTonePlayer::play(self, tone)
    }
}

/// Mock tone player for testing.
#[derive(Debug, Default)]
pub struct MockTonePlayer {
    play_calls: std::sync::Mutex<Vec<Tone>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockTonePlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<Tone> {
        self.play_calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
    }
}

impl TonePlayer for MockTonePlayer {
    fn play(&self, tone: &Tone) -> Result<(), SoundError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(*tone);
        Ok(())
    }
}
