//! Lightweight task list.
//!
//! The timer only knows tasks through [`TaskCollaborator`]: when a work
//! interval completes while a task is designated active, that task is
//! credited with one interval.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Maximum length of a task's text, in characters.
pub const MAX_TASK_TEXT_LENGTH: usize = 100;

/// Allowed estimate of intervals per task.
pub const ESTIMATE_RANGE: std::ops::RangeInclusive<u32> = 1..=20;

// ============================================================================
// TaskError
// ============================================================================

/// Errors from task list operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Task text was empty after trimming.
    #[error("task text cannot be empty")]
    EmptyText,

    /// No task has the given id.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// No task at the given 1-based position.
    #[error("no task at position {0}")]
    InvalidPosition(usize),
}

impl TaskError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::EmptyText => "type some text after 'task add'",
            Self::NotFound(_) | Self::InvalidPosition(_) => "run 'tasks' to see valid task numbers",
        }
    }
}

// ============================================================================
// Task
// ============================================================================

/// Opaque task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A to-do item with an interval estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    /// Planned work intervals (1-20)
    pub estimated_intervals: u32,
    /// Work intervals completed while this task was active
    pub spent_intervals: u32,
    /// Creation time in milliseconds since the Unix epoch
    pub created_at_ms: u64,
}

// ============================================================================
// TaskCollaborator
// ============================================================================

/// The timer's view of the task list.
pub trait TaskCollaborator {
    /// Credits one completed work interval to `id`.
    ///
    /// Implementations ignore ids they do not know.
    fn increment_completed_intervals(&mut self, id: TaskId);
}

// ============================================================================
// TaskList
// ============================================================================

/// Ordered task list, newest first.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

/// Trims the text and removes control characters.
fn sanitize_text(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_TASK_TEXT_LENGTH)
        .collect()
}

impl TaskList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task at the top of the list.
    ///
    /// Text longer than [`MAX_TASK_TEXT_LENGTH`] is truncated.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::EmptyText` if nothing remains after trimming.
    pub fn add(&mut self, text: &str) -> Result<TaskId, TaskError> {
        let text = sanitize_text(text);
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }

        let id = TaskId::new();
        self.tasks.insert(
            0,
            Task {
                id,
                text,
                completed: false,
                estimated_intervals: *ESTIMATE_RANGE.start(),
                spent_intervals: 0,
                created_at_ms: now_ms(),
            },
        );
        debug!(%id, "Task added");
        Ok(id)
    }

    /// Flips the completed flag and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::NotFound` for an unknown id.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<bool, TaskError> {
        let task = self.get_mut(id)?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    /// Removes a task and returns it.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::NotFound` for an unknown id.
    pub fn delete(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        Ok(self.tasks.remove(index))
    }

    /// Sets the interval estimate, clamped into 1-20, and returns it.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::NotFound` for an unknown id.
    pub fn set_estimate(&mut self, id: TaskId, estimate: u32) -> Result<u32, TaskError> {
        let task = self.get_mut(id)?;
        task.estimated_intervals = estimate.clamp(*ESTIMATE_RANGE.start(), *ESTIMATE_RANGE.end());
        Ok(task.estimated_intervals)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    /// Resolves a 1-based list position to a task id.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::InvalidPosition` if there is no such position.
    pub fn id_at(&self, position: usize) -> Result<TaskId, TaskError> {
        position
            .checked_sub(1)
            .and_then(|index| self.tasks.get(index))
            .map(|t| t.id)
            .ok_or(TaskError::InvalidPosition(position))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len() - self.completed_count()
    }
}

impl TaskCollaborator for TaskList {
    fn increment_completed_intervals(&mut self, id: TaskId) {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => task.spent_intervals += 1,
            None => debug!(%id, "Completed interval for unknown task ignored"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
