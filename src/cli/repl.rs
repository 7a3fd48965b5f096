//! Interactive command language.
//!
//! One command per line, whitespace separated. Task numbers are 1-based
//! positions in the order `tasks` lists them.

use thiserror::Error;

use crate::types::{SettingsUpdate, TimerMode};

/// Errors from parsing an interactive command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid {what} '{value}'")]
    InvalidValue { what: &'static str, value: String },

    #[error("unknown setting '{0}'")]
    UnknownSetting(String),
}

impl CommandError {
    /// Returns a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) | Self::MissingArgument { .. } => {
                "type 'help' to list commands"
            }
            Self::InvalidValue { .. } => "numbers must be whole minutes; volume is 0.0-1.0",
            Self::UnknownSetting(_) => {
                "settings: work, short, long, interval, auto-breaks, auto-work, volume, sound, notifications"
            }
        }
    }
}

/// A parsed interactive command.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Start,
    Pause,
    Stop,
    Reset,
    Mode { mode: TimerMode, auto_start: bool },
    Set(SettingsUpdate),
    Sound(bool),
    Status,
    Stats,
    Settings,
    TaskAdd(String),
    TaskDone(usize),
    TaskRemove(usize),
    /// `None` clears the designation
    TaskActive(Option<usize>),
    TaskEstimate { position: usize, estimate: u32 },
    Tasks,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parses one input line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` describing the first problem found.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let Some((head, rest)) = split_word(line) else {
            return Ok(None);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "start" | "resume" => Self::Start,
            "pause" => Self::Pause,
            "stop" => Self::Stop,
            "reset" => Self::Reset,
            "mode" => parse_mode(rest)?,
            "set" => parse_set(rest)?,
            "sound" => {
                let value = required(rest, "sound", "on or off")?;
                Self::Sound(parse_bool(value, "sound toggle")?)
            }
            "status" | "s" => Self::Status,
            "stats" => Self::Stats,
            "settings" => Self::Settings,
            "task" => parse_task(rest)?,
            "tasks" | "ls" => Self::Tasks,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Splits off the first word. Returns `None` for blank input.
fn split_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    match input.split_once(char::is_whitespace) {
        Some((head, rest)) => Some((head, rest.trim())),
        None => Some((input, "")),
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    split_word(rest)
        .map(|(word, _)| word)
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn parse_bool(value: &str, what: &'static str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(CommandError::InvalidValue {
            what,
            value: value.to_string(),
        }),
    }
}

fn parse_number<N: std::str::FromStr>(value: &str, what: &'static str) -> Result<N, CommandError> {
    value.parse().map_err(|_| CommandError::InvalidValue {
        what,
        value: value.to_string(),
    })
}

fn parse_mode(rest: &str) -> Result<ReplCommand, CommandError> {
    let (target, rest) =
        split_word(rest).ok_or(CommandError::MissingArgument {
            command: "mode",
            argument: "work, short or long",
        })?;
    let mode = target
        .parse::<TimerMode>()
        .map_err(|_| CommandError::InvalidValue {
            what: "mode",
            value: target.to_string(),
        })?;
    let auto_start = match split_word(rest) {
        None => false,
        Some((flag, _)) if flag.eq_ignore_ascii_case("auto") => true,
        Some((flag, _)) => parse_bool(flag, "auto-start flag")?,
    };
    Ok(ReplCommand::Mode { mode, auto_start })
}

fn parse_set(rest: &str) -> Result<ReplCommand, CommandError> {
    let (field, rest) = split_word(rest).ok_or(CommandError::MissingArgument {
        command: "set",
        argument: "a setting name",
    })?;
    let value = required(rest, "set", "a value")?;

    let mut update = SettingsUpdate::default();
    match field.to_ascii_lowercase().as_str() {
        "work" => update.work_minutes = Some(parse_number(value, "work minutes")?),
        "short" | "short-break" => {
            update.short_break_minutes = Some(parse_number(value, "short break minutes")?)
        }
        "long" | "long-break" => {
            update.long_break_minutes = Some(parse_number(value, "long break minutes")?)
        }
        "interval" | "long-break-interval" => {
            update.long_break_interval = Some(parse_number(value, "long break interval")?)
        }
        "auto-breaks" | "auto-start-breaks" => {
            update.auto_start_breaks = Some(parse_bool(value, "auto-start flag")?)
        }
        "auto-work" | "auto-start-work" => {
            update.auto_start_work = Some(parse_bool(value, "auto-start flag")?)
        }
        "volume" => {
            let volume: f32 = parse_number(value, "volume")?;
            if !volume.is_finite() {
                return Err(CommandError::InvalidValue {
                    what: "volume",
                    value: value.to_string(),
                });
            }
            update.sound_volume = Some(volume);
        }
        "sound" => update.sound_enabled = Some(parse_bool(value, "sound toggle")?),
        "notifications" | "notify" => {
            update.notifications_enabled = Some(parse_bool(value, "notification toggle")?)
        }
        other => return Err(CommandError::UnknownSetting(other.to_string())),
    }
    Ok(ReplCommand::Set(update))
}

fn parse_position(rest: &str, command: &'static str) -> Result<usize, CommandError> {
    let value = required(rest, command, "a task number")?;
    parse_number(value, "task number")
}

fn parse_task(rest: &str) -> Result<ReplCommand, CommandError> {
    let (action, rest) = split_word(rest).ok_or(CommandError::MissingArgument {
        command: "task",
        argument: "add, done, rm, active or estimate",
    })?;

    let command = match action.to_ascii_lowercase().as_str() {
        "add" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "task add",
                    argument: "task text",
                });
            }
            ReplCommand::TaskAdd(rest.to_string())
        }
        "done" => ReplCommand::TaskDone(parse_position(rest, "task done")?),
        "rm" | "delete" => ReplCommand::TaskRemove(parse_position(rest, "task rm")?),
        "active" => match required(rest, "task active", "a task number or 'none'")? {
            none if none.eq_ignore_ascii_case("none") => ReplCommand::TaskActive(None),
            position => ReplCommand::TaskActive(Some(parse_number(position, "task number")?)),
        },
        "estimate" => {
            let position = parse_position(rest, "task estimate")?;
            let (_, count) = split_word(rest).unwrap_or_default();
            let estimate = parse_number(required(count, "task estimate", "an interval count")?, "estimate")?;
            ReplCommand::TaskEstimate { position, estimate }
        }
        other => return Err(CommandError::UnknownCommand(format!("task {}", other))),
    };
    Ok(command)
}
