//! Command definitions for the pomoflow CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::SettingsUpdate;

// ============================================================================
// CLI Structure
// ============================================================================

/// pomoflow - an interval timer with a task list for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomoflow",
    version,
    about = "Interval (Pomodoro) timer with a lightweight task list",
    long_about = "A terminal interval timer alternating focus time with short and long breaks.\n\
                  Type commands such as 'start', 'pause' or 'task add <text>' while it runs.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive timer in the foreground
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command. Flags override the settings file.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Settings file (JSON)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Work duration in minutes (1-90)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=90))]
    pub work: Option<u32>,

    /// Short break duration in minutes (1-30)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=30))]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (1-60)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub long_break: Option<u32>,

    /// Work intervals per long break (2-10)
    #[arg(short = 'i', long, value_parser = clap::value_parser!(u32).range(2..=10))]
    pub long_break_interval: Option<u32>,

    /// Start breaks automatically after a work interval
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub auto_start_breaks: Option<bool>,

    /// Start work automatically after a break
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub auto_start_work: Option<bool>,

    /// Tone volume (0.0-1.0)
    #[arg(long, value_parser = parse_volume)]
    pub volume: Option<f32>,

    /// Disable completion tones
    #[arg(long)]
    pub no_sound: bool,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notifications: bool,

    /// Add a task to the list at startup (repeatable)
    #[arg(short, long = "task", value_name = "TEXT", value_parser = validate_task_text)]
    pub tasks: Vec<String>,
}

impl RunArgs {
    /// Returns the settings overrides given on the command line.
    pub fn to_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            work_minutes: self.work,
            short_break_minutes: self.short_break,
            long_break_minutes: self.long_break,
            long_break_interval: self.long_break_interval,
            auto_start_breaks: self.auto_start_breaks,
            auto_start_work: self.auto_start_work,
            sound_volume: self.volume,
            sound_enabled: self.no_sound.then_some(false),
            notifications_enabled: self.no_notifications.then_some(false),
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates a volume in `[0.0, 1.0]`.
fn parse_volume(s: &str) -> Result<f32, String> {
    let volume: f32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !(0.0..=1.0).contains(&volume) {
        return Err("volume must be between 0.0 and 1.0".to_string());
    }
    Ok(volume)
}

/// Validates the task text.
///
/// - Must not be blank
/// - Must not exceed 100 characters
fn validate_task_text(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("task text cannot be empty".to_string());
    }
    if s.chars().count() > 100 {
        return Err("task text must be 100 characters or fewer".to_string());
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================
