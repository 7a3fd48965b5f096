//! Core data types for the interval timer.
//!
//! This module defines the data structures used for:
//! - Timer modes and their presentation labels
//! - Settings with range clamping
//! - Session counters
//! - The timer state value and its transition functions

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerMode
// ============================================================================

/// The phase of the timer. Each mode has its own configured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// Focused work interval
    Work,
    /// Short break between work intervals
    ShortBreak,
    /// Long break after every N work intervals
    LongBreak,
}

impl TimerMode {
    /// All modes in display order.
    pub const ALL: [TimerMode; 3] = [TimerMode::Work, TimerMode::ShortBreak, TimerMode::LongBreak];

    /// Returns the machine-readable name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    /// Returns the human-readable label of the mode.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Work => "Focus Time",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    /// Returns a one-line description of the mode.
    pub fn description(&self) -> &'static str {
        match self {
            TimerMode::Work => "Time to focus on your tasks",
            TimerMode::ShortBreak => "Take a quick breather",
            TimerMode::LongBreak => "Well-deserved longer break",
        }
    }

    /// Returns true for either break mode.
    pub fn is_break(&self) -> bool {
        matches!(self, TimerMode::ShortBreak | TimerMode::LongBreak)
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Work
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "focus" => Ok(TimerMode::Work),
            "short" | "short_break" | "short-break" | "shortbreak" => Ok(TimerMode::ShortBreak),
            "long" | "long_break" | "long-break" | "longbreak" => Ok(TimerMode::LongBreak),
            other => Err(format!("unknown mode '{}' (expected work, short or long)", other)),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Allowed work duration in minutes.
pub const WORK_MINUTES_RANGE: RangeInclusive<u32> = 1..=90;
/// Allowed short break duration in minutes.
pub const SHORT_BREAK_MINUTES_RANGE: RangeInclusive<u32> = 1..=30;
/// Allowed long break duration in minutes.
pub const LONG_BREAK_MINUTES_RANGE: RangeInclusive<u32> = 1..=60;
/// Allowed number of work intervals between long breaks.
pub const LONG_BREAK_INTERVAL_RANGE: RangeInclusive<u32> = 2..=10;

fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

/// User-facing timer configuration.
///
/// The timer core treats this as read-only and re-reads it whenever a mode's
/// duration is needed. Missing fields in a settings file take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Work duration in minutes (1-90)
    pub work_minutes: u32,
    /// Short break duration in minutes (1-30)
    pub short_break_minutes: u32,
    /// Long break duration in minutes (1-60)
    pub long_break_minutes: u32,
    /// Work intervals per long break (2-10)
    pub long_break_interval: u32,
    /// Start breaks automatically after a work interval
    pub auto_start_breaks: bool,
    /// Start work automatically after a break
    pub auto_start_work: bool,
    /// Tone volume (0.0-1.0)
    pub sound_volume: f32,
    /// Whether completion tones are played
    pub sound_enabled: bool,
    /// Whether desktop notifications are shown
    pub notifications_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 4,
            auto_start_breaks: true,
            auto_start_work: false,
            sound_volume: 0.5,
            sound_enabled: true,
            notifications_enabled: true,
        }
    }
}

impl Settings {
    /// Sets the work duration.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Sets the short break duration.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = minutes;
        self
    }

    /// Sets the long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Sets the number of work intervals per long break.
    pub fn with_long_break_interval(mut self, interval: u32) -> Self {
        self.long_break_interval = interval;
        self
    }

    /// Returns the configured duration of `mode` in seconds.
    pub fn duration_secs(&self, mode: TimerMode) -> u32 {
        let minutes = match mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        };
        minutes.saturating_mul(60)
    }

    /// Returns true if any mode's duration differs from `other`.
    pub fn durations_differ(&self, other: &Self) -> bool {
        self.work_minutes != other.work_minutes
            || self.short_break_minutes != other.short_break_minutes
            || self.long_break_minutes != other.long_break_minutes
    }

    /// Returns a copy with every field forced into its valid range.
    ///
    /// Integer fields are clamped. A non-finite volume falls back to the
    /// volume of `previous`.
    #[must_use]
    pub fn sanitized(self, previous: &Settings) -> Settings {
        let sound_volume = if self.sound_volume.is_finite() {
            self.sound_volume.clamp(0.0, 1.0)
        } else {
            previous.sound_volume.clamp(0.0, 1.0)
        };

        Settings {
            work_minutes: clamp_to(self.work_minutes, &WORK_MINUTES_RANGE),
            short_break_minutes: clamp_to(self.short_break_minutes, &SHORT_BREAK_MINUTES_RANGE),
            long_break_minutes: clamp_to(self.long_break_minutes, &LONG_BREAK_MINUTES_RANGE),
            long_break_interval: clamp_to(self.long_break_interval, &LONG_BREAK_INTERVAL_RANGE),
            sound_volume,
            ..self
        }
    }

    /// Applies a partial update on top of these settings and sanitizes the result.
    #[must_use]
    pub fn apply(&self, update: &SettingsUpdate) -> Settings {
        let merged = Settings {
            work_minutes: update.work_minutes.unwrap_or(self.work_minutes),
            short_break_minutes: update
                .short_break_minutes
                .unwrap_or(self.short_break_minutes),
            long_break_minutes: update.long_break_minutes.unwrap_or(self.long_break_minutes),
            long_break_interval: update
                .long_break_interval
                .unwrap_or(self.long_break_interval),
            auto_start_breaks: update.auto_start_breaks.unwrap_or(self.auto_start_breaks),
            auto_start_work: update.auto_start_work.unwrap_or(self.auto_start_work),
            sound_volume: update.sound_volume.unwrap_or(self.sound_volume),
            sound_enabled: update.sound_enabled.unwrap_or(self.sound_enabled),
            notifications_enabled: update
                .notifications_enabled
                .unwrap_or(self.notifications_enabled),
        };
        merged.sanitized(self)
    }
}

/// A partial settings change. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub work_minutes: Option<u32>,
    pub short_break_minutes: Option<u32>,
    pub long_break_minutes: Option<u32>,
    pub long_break_interval: Option<u32>,
    pub auto_start_breaks: Option<bool>,
    pub auto_start_work: Option<bool>,
    pub sound_volume: Option<f32>,
    pub sound_enabled: Option<bool>,
    pub notifications_enabled: Option<bool>,
}

impl SettingsUpdate {
    /// Returns true if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == SettingsUpdate::default()
    }
}

// ============================================================================
// SessionCounters
// ============================================================================

/// Cumulative count of completed work intervals. Not cleared by `reset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    /// Completed work intervals today
    pub today: u32,
    /// Completed work intervals since the process started
    pub total: u32,
}

impl SessionCounters {
    /// Returns the counters after one more completed work interval.
    #[must_use]
    pub fn recorded(self) -> Self {
        Self {
            today: self.today.saturating_add(1),
            total: self.total.saturating_add(1),
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Result of applying one tick to a [`TimerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed
    Idle,
    /// One second was counted down
    Counted,
    /// The countdown reached zero and the interval completed
    Completed,
}

/// Snapshot of the timer. Every transition returns a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current mode
    pub mode: TimerMode,
    /// Seconds left in the current interval
    pub remaining_seconds: u32,
    /// Whether the countdown is active
    pub running: bool,
    /// Work intervals completed since the last reset
    pub completed_work_intervals: u32,
}

impl TimerState {
    /// Creates the initial state: paused at the start of a work interval.
    pub fn new(settings: &Settings) -> Self {
        Self {
            mode: TimerMode::Work,
            remaining_seconds: settings.duration_secs(TimerMode::Work),
            running: false,
            completed_work_intervals: 0,
        }
    }

    /// Returns the state with the countdown running.
    #[must_use]
    pub fn started(self) -> Self {
        Self {
            running: true,
            ..self
        }
    }

    /// Returns the state with the countdown halted, keeping remaining time.
    #[must_use]
    pub fn paused(self) -> Self {
        Self {
            running: false,
            ..self
        }
    }

    /// Returns the state halted with the current interval's progress discarded.
    #[must_use]
    pub fn stopped(self, settings: &Settings) -> Self {
        Self {
            running: false,
            remaining_seconds: settings.duration_secs(self.mode),
            ..self
        }
    }

    /// Returns the state after a full reset. Equivalent to [`TimerState::new`].
    #[must_use]
    pub fn reset(settings: &Settings) -> Self {
        Self::new(settings)
    }

    /// Returns the state at the start of `target`, running if `auto_start`.
    #[must_use]
    pub fn switched(self, target: TimerMode, auto_start: bool, settings: &Settings) -> Self {
        Self {
            mode: target,
            remaining_seconds: settings.duration_secs(target),
            running: auto_start,
            ..self
        }
    }

    /// Applies one elapsed second.
    ///
    /// Reaching zero while running completes the interval and halts the
    /// countdown; the caller decides what comes next.
    #[must_use]
    pub fn ticked(self) -> (Self, TickOutcome) {
        if !self.running {
            return (self, TickOutcome::Idle);
        }

        let remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if remaining_seconds == 0 {
            let next = Self {
                remaining_seconds,
                running: false,
                ..self
            };
            (next, TickOutcome::Completed)
        } else {
            let next = Self {
                remaining_seconds,
                ..self
            };
            (next, TickOutcome::Counted)
        }
    }

    /// Returns the state with one more completed work interval.
    #[must_use]
    pub fn with_work_interval_recorded(self) -> Self {
        Self {
            completed_work_intervals: self.completed_work_intervals.saturating_add(1),
            ..self
        }
    }

    /// Returns the state after a settings change.
    ///
    /// While halted, a change to any mode's duration restarts the interval
    /// at the current mode's full duration. A running countdown is left
    /// untouched.
    #[must_use]
    pub fn reconfigured(self, previous: &Settings, settings: &Settings) -> Self {
        if self.running || !settings.durations_differ(previous) {
            return self;
        }
        Self {
            remaining_seconds: settings.duration_secs(self.mode),
            ..self
        }
    }

    /// Returns true if a tick source should be armed for this state.
    pub fn is_tick_due(&self) -> bool {
        self.running && self.remaining_seconds > 0
    }

    /// Returns the percentage of the current interval already elapsed.
    pub fn progress_percent(&self, settings: &Settings) -> f64 {
        progress_percent(settings.duration_secs(self.mode), self.remaining_seconds)
    }

    /// Returns how many work intervals of the current long-break cycle are done.
    pub fn cycle_position(&self, long_break_interval: u32) -> u32 {
        if long_break_interval == 0 {
            return 0;
        }
        self.completed_work_intervals % long_break_interval
    }
}

/// Chooses the break that follows the `completed`-th work interval.
///
/// Every `long_break_interval`-th completion earns a long break.
pub fn next_mode_after_work(completed: u32, long_break_interval: u32) -> TimerMode {
    if long_break_interval > 0 && completed > 0 && completed % long_break_interval == 0 {
        TimerMode::LongBreak
    } else {
        TimerMode::ShortBreak
    }
}

/// Elapsed share of an interval as a percentage in `[0, 100]`.
///
/// A zero-length interval counts as complete.
pub fn progress_percent(duration_secs: u32, remaining_seconds: u32) -> f64 {
    if duration_secs == 0 {
        return 100.0;
    }
    let elapsed = duration_secs.saturating_sub(remaining_seconds);
    (f64::from(elapsed) / f64::from(duration_secs) * 100.0).clamp(0.0, 100.0)
}

/// Formats seconds as zero-padded `MM:SS`.
pub fn format_clock(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// Tests
// ============================================================================
