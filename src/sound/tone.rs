//! Completion tone planning.
//!
//! A finished work interval is announced with two beeps (a low one, then a
//! higher one shortly after); a finished break with a single lower beep.

use std::time::Duration;

use crate::types::TimerMode;

/// Pitch of the first beep after a work interval.
pub const WORK_TONE_HZ: f32 = 800.0;
/// Pitch of the second beep after a work interval.
pub const WORK_FOLLOW_UP_TONE_HZ: f32 = 1000.0;
/// Pitch of the beep after a break.
pub const BREAK_TONE_HZ: f32 = 600.0;
/// Length of every beep.
pub const TONE_DURATION: Duration = Duration::from_millis(300);
/// Fixed gap before the second work beep starts.
pub const FOLLOW_UP_DELAY: Duration = Duration::from_millis(400);
/// Full volume maps to this amplitude.
pub const AMPLITUDE_SCALE: f32 = 0.1;

/// A single sine beep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Pitch in hertz
    pub frequency_hz: f32,
    /// Linear amplitude (already scaled by volume)
    pub amplitude: f32,
    /// How long the beep sounds
    pub duration: Duration,
    /// Silence before the beep starts
    pub delay: Duration,
}

impl Tone {
    fn new(frequency_hz: f32, amplitude: f32) -> Self {
        Self {
            frequency_hz,
            amplitude,
            duration: TONE_DURATION,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    fn delayed(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }
}

/// Returns the beeps announcing the end of `completed`, scaled by `volume`.
#[must_use]
pub fn completion_tones(completed: TimerMode, volume: f32) -> Vec<Tone> {
    let amplitude = volume.clamp(0.0, 1.0) * AMPLITUDE_SCALE;
    match completed {
        TimerMode::Work => vec![
            Tone::new(WORK_TONE_HZ, amplitude),
            Tone::new(WORK_FOLLOW_UP_TONE_HZ, amplitude).delayed(FOLLOW_UP_DELAY),
        ],
        TimerMode::ShortBreak | TimerMode::LongBreak => vec![Tone::new(BREAK_TONE_HZ, amplitude)],
    }
}
