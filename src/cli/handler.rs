//! Applies interactive commands to the timer engine and task list.

use tracing::debug;

use super::display::Display;
use super::repl::ReplCommand;
use crate::engine::TimerEngine;
use crate::tasks::{TaskError, TaskList};
use crate::types::SettingsUpdate;

/// What the run loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print a message to stdout
    Message(String),
    /// Print an error with a hint to stderr
    Error { message: String, hint: String },
    /// Nothing to print; engine events report the change
    Silent,
    /// Leave the run loop
    Quit,
}

impl Reply {
    fn error(message: impl ToString, hint: &str) -> Self {
        Self::Error {
            message: message.to_string(),
            hint: hint.to_string(),
        }
    }
}

impl From<TaskError> for Reply {
    fn from(e: TaskError) -> Self {
        Reply::error(&e, e.suggestion())
    }
}

/// Owns the engine and translates commands into engine calls.
pub struct CommandHandler {
    engine: TimerEngine<TaskList>,
}

impl CommandHandler {
    pub fn new(engine: TimerEngine<TaskList>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &TimerEngine<TaskList> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TimerEngine<TaskList> {
        &mut self.engine
    }

    /// Parses and applies one input line.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        match ReplCommand::parse(line) {
            Ok(Some(command)) => self.handle(command),
            Ok(None) => Reply::Silent,
            Err(e) => Reply::error(&e, e.suggestion()),
        }
    }

    /// Applies a parsed command.
    pub fn handle(&mut self, command: ReplCommand) -> Reply {
        debug!(?command, "Handling command");
        match command {
            ReplCommand::Start => {
                if self.engine.start() {
                    Reply::Silent
                } else {
                    Reply::Message("Timer is already running".to_string())
                }
            }
            ReplCommand::Pause => {
                if self.engine.pause() {
                    Reply::Silent
                } else {
                    Reply::Message("Timer is already paused".to_string())
                }
            }
            ReplCommand::Stop => {
                self.engine.stop();
                Reply::Silent
            }
            ReplCommand::Reset => {
                self.engine.reset();
                Reply::Silent
            }
            ReplCommand::Mode { mode, auto_start } => {
                self.engine.switch_mode(mode, auto_start);
                Reply::Silent
            }
            ReplCommand::Set(update) => {
                self.engine.apply_update(&update);
                Reply::Silent
            }
            ReplCommand::Sound(enabled) => {
                self.engine.apply_update(&SettingsUpdate {
                    sound_enabled: Some(enabled),
                    ..SettingsUpdate::default()
                });
                let state = if enabled { "on" } else { "off" };
                Reply::Message(format!("Sound {}", state))
            }
            ReplCommand::Status => Reply::Message(Display::status(&self.engine)),
            ReplCommand::Stats => Reply::Message(Display::stats(&self.engine)),
            ReplCommand::Settings => Reply::Message(Display::settings(&self.engine)),
            ReplCommand::Tasks => Reply::Message(Display::tasks(&self.engine)),
            ReplCommand::Help => Reply::Message(Display::help().to_string()),
            ReplCommand::Quit => Reply::Quit,
            ReplCommand::TaskAdd(text) => self.add_task(&text).unwrap_or_else(Reply::from),
            ReplCommand::TaskDone(position) => {
                self.toggle_task(position).unwrap_or_else(Reply::from)
            }
            ReplCommand::TaskRemove(position) => {
                self.remove_task(position).unwrap_or_else(Reply::from)
            }
            ReplCommand::TaskActive(position) => {
                self.designate_task(position).unwrap_or_else(Reply::from)
            }
            ReplCommand::TaskEstimate { position, estimate } => self
                .estimate_task(position, estimate)
                .unwrap_or_else(Reply::from),
        }
    }

    // ------------------------------------------------------------------------
    // Task commands
    // ------------------------------------------------------------------------

    fn add_task(&mut self, text: &str) -> Result<Reply, TaskError> {
        let id = self.engine.tasks_mut().add(text)?;
        let text = self
            .engine
            .tasks()
            .get(id)
            .map(|t| t.text.clone())
            .unwrap_or_default();
        Ok(Reply::Message(format!("Added task 1: {}", text)))
    }

    fn toggle_task(&mut self, position: usize) -> Result<Reply, TaskError> {
        let tasks = self.engine.tasks_mut();
        let id = tasks.id_at(position)?;
        let completed = tasks.toggle_completed(id)?;
        let state = if completed { "done" } else { "not done" };
        Ok(Reply::Message(format!("Task {} marked {}", position, state)))
    }

    fn remove_task(&mut self, position: usize) -> Result<Reply, TaskError> {
        let id = self.engine.tasks().id_at(position)?;
        let task = self.engine.tasks_mut().delete(id)?;
        if self.engine.active_task() == Some(id) {
            self.engine.designate_active_task(None);
        }
        Ok(Reply::Message(format!("Removed task: {}", task.text)))
    }

    fn designate_task(&mut self, position: Option<usize>) -> Result<Reply, TaskError> {
        let Some(position) = position else {
            self.engine.designate_active_task(None);
            return Ok(Reply::Message("No active task".to_string()));
        };

        let id = self.engine.tasks().id_at(position)?;
        if self.engine.active_task() == Some(id) {
            self.engine.designate_active_task(None);
            return Ok(Reply::Message("No active task".to_string()));
        }

        self.engine.designate_active_task(Some(id));
        let text = self
            .engine
            .tasks()
            .get(id)
            .map(|t| t.text.clone())
            .unwrap_or_default();
        Ok(Reply::Message(format!("Active task: {}", text)))
    }

    fn estimate_task(&mut self, position: usize, estimate: u32) -> Result<Reply, TaskError> {
        let tasks = self.engine.tasks_mut();
        let id = tasks.id_at(position)?;
        let estimate = tasks.set_estimate(id, estimate)?;
        Ok(Reply::Message(format!(
            "Task {} estimate: {} intervals",
            position, estimate
        )))
    }
}

// ============================================================================
// Tests
// ============================================================================
