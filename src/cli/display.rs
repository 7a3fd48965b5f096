//! Display utilities for the pomoflow CLI.
//!
//! This module provides formatted output for:
//! - Timer status and statistics
//! - Settings and the task list
//! - Engine events
//! - Help and error messages
//!
//! Renderers return strings; the run loop decides where they go.

use crate::engine::{TimerEngine, TimerEvent};
use crate::tasks::TaskList;
use crate::types::format_clock;

const RULE: &str = "─────────────────────────────";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Renders the current timer status.
    pub fn status(engine: &TimerEngine<TaskList>) -> String {
        let state = engine.state();
        let run_state = if state.running { "running" } else { "paused" };

        let mut lines = vec![
            state.mode.label().to_string(),
            RULE.to_string(),
            format!(
                "  {}  [{}]  {:.0}%",
                format_clock(state.remaining_seconds),
                run_state,
                engine.progress_percent()
            ),
            format!("  {}", state.mode.description()),
        ];

        let active = engine
            .active_task()
            .and_then(|id| engine.tasks().get(id));
        if let Some(task) = active {
            lines.push(format!("  Active task: {}", task.text));
        }
        lines.join("\n")
    }

    /// Renders session statistics.
    pub fn stats(engine: &TimerEngine<TaskList>) -> String {
        let state = engine.state();
        let counters = engine.counters();
        let interval = engine.settings().long_break_interval;
        let tasks = engine.tasks();

        [
            "Statistics".to_string(),
            RULE.to_string(),
            format!("  Today:        {}", counters.today),
            format!("  This session: {}", state.completed_work_intervals),
            format!("  Total:        {}", counters.total),
            format!(
                "  Tasks done:   {}/{}",
                tasks.completed_count(),
                tasks.len()
            ),
            format!(
                "  Cycle:        {}/{}",
                state.cycle_position(interval),
                interval
            ),
        ]
        .join("\n")
    }

    /// Renders the active settings.
    pub fn settings(engine: &TimerEngine<TaskList>) -> String {
        let settings = engine.settings();
        let on_off = |flag: bool| if flag { "on" } else { "off" };

        [
            "Settings".to_string(),
            RULE.to_string(),
            format!("  work:          {} min", settings.work_minutes),
            format!("  short:         {} min", settings.short_break_minutes),
            format!("  long:          {} min", settings.long_break_minutes),
            format!("  interval:      {}", settings.long_break_interval),
            format!("  auto-breaks:   {}", on_off(settings.auto_start_breaks)),
            format!("  auto-work:     {}", on_off(settings.auto_start_work)),
            format!("  volume:        {:.2}", settings.sound_volume),
            format!("  sound:         {}", on_off(settings.sound_enabled)),
            format!("  notifications: {}", on_off(settings.notifications_enabled)),
        ]
        .join("\n")
    }

    /// Renders the task list with 1-based positions.
    ///
    /// The active task is marked with `*`.
    pub fn tasks(engine: &TimerEngine<TaskList>) -> String {
        let tasks = engine.tasks();
        if tasks.is_empty() {
            return "No tasks yet. Add one with 'task add <text>'.".to_string();
        }

        let header = format!(
            "Tasks ({} pending, {} done)",
            tasks.pending_count(),
            tasks.completed_count()
        );
        let rows = tasks.iter().enumerate().map(|(index, task)| {
            let check = if task.completed { "x" } else { " " };
            let marker = if engine.active_task() == Some(task.id) {
                " *"
            } else {
                ""
            };
            format!(
                "  {:>2}. [{}] {} ({}/{}){}",
                index + 1,
                check,
                task.text,
                task.spent_intervals,
                task.estimated_intervals,
                marker
            )
        });
        std::iter::once(header)
            .chain(rows)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders an engine event, or `None` for events shown only on demand.
    pub fn event(event: &TimerEvent) -> Option<String> {
        let line = match event {
            TimerEvent::Started => "> Timer started".to_string(),
            TimerEvent::Paused => "|| Timer paused".to_string(),
            TimerEvent::Stopped => "[] Timer stopped".to_string(),
            TimerEvent::Reset => "Timer reset".to_string(),
            TimerEvent::ModeSwitched { mode, auto_start } => {
                if *auto_start {
                    format!("-> {} (running)", mode.label())
                } else {
                    format!("-> {} (type 'start' to begin)", mode.label())
                }
            }
            TimerEvent::IntervalCompleted {
                mode,
                completed_work_intervals,
            } => format!(
                "* {} complete! ({} this session)",
                mode.label(),
                completed_work_intervals
            ),
            TimerEvent::SettingsUpdated => "Settings updated".to_string(),
            TimerEvent::Tick { .. } => return None,
        };
        Some(line)
    }

    /// Renders the interactive command reference.
    pub fn help() -> &'static str {
        "Commands
─────────────────────────────
  start | pause | stop | reset
  mode <work|short|long> [auto]   switch mode, optionally running
  set <field> <value>             work, short, long, interval,
                                  auto-breaks, auto-work, volume,
                                  sound, notifications
  sound <on|off>
  status | stats | settings
  task add <text>
  task done <n> | task rm <n>
  task active <n|none>
  task estimate <n> <count>
  tasks
  help | quit"
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Shows an error message with a hint.
    pub fn show_error_with_hint(message: &str, hint: &str) {
        eprintln!("error: {}", message);
        eprintln!("  hint: {}", hint);
    }
}

// ============================================================================
// Tests
// ============================================================================
