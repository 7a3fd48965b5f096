//! pomoflow library
//!
//! This library provides the core functionality of the pomoflow timer.
//! It includes:
//! - Timer state values and transition functions
//! - The timer engine with a cancellable tick source
//! - Completion tones and desktop notifications (best-effort)
//! - A lightweight task list credited with completed work intervals
//! - Settings file loading
//! - CLI command parsing, the interactive loop and display utilities

pub mod cli;
pub mod config;
pub mod engine;
pub mod notification;
pub mod sound;
pub mod tasks;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{SessionCounters, Settings, SettingsUpdate, TickOutcome, TimerMode, TimerState};

pub use engine::{EffectDispatcher, IntervalTicker, TickSchedule, TickToken, TimerEngine, TimerEvent};

pub use notification::{
    MockNotifier, NotificationContent, NotificationError, NotificationPermission, Notifier,
};

pub use sound::{MockTonePlayer, RodioTonePlayer, SoundError, Tone, TonePlayer};

pub use tasks::{Task, TaskCollaborator, TaskError, TaskId, TaskList};

pub use config::{load_settings, ConfigError};
