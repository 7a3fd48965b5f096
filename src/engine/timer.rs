//! Timer engine for the interval timer.
//!
//! This module provides the core timer functionality:
//! - Commands (start, pause, stop, reset, switch mode, reconfigure)
//! - Countdown driven by an external, cancellable tick source
//! - The completion protocol (counters, task credit, next mode, effects)
//! - Event firing for the presentation layer

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::effects::EffectDispatcher;
use super::ticker::{TickSchedule, TickToken};
use crate::tasks::{TaskCollaborator, TaskId};
use crate::types::{
    next_mode_after_work, SessionCounters, Settings, SettingsUpdate, TickOutcome, TimerMode,
    TimerState,
};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started or resumed
    Started,
    /// Countdown paused
    Paused,
    /// Current interval abandoned
    Stopped,
    /// Timer reset to a fresh work interval
    Reset,
    /// Mode changed
    ModeSwitched {
        /// The new mode
        mode: TimerMode,
        /// Whether the new interval started running
        auto_start: bool,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// An interval ran down to zero
    IntervalCompleted {
        /// The mode that just finished
        mode: TimerMode,
        /// Work intervals completed since the last reset
        completed_work_intervals: u32,
    },
    /// Settings were replaced
    SettingsUpdated,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns the timer state and reacts to commands and ticks.
///
/// The engine never runs a clock of its own. A tick source polls
/// [`TimerEngine::tick_token`] after every command and feeds ticks back
/// through [`TimerEngine::on_tick`]; tests can call [`TimerEngine::tick`]
/// directly.
pub struct TimerEngine<T: TaskCollaborator> {
    /// Current timer state
    state: TimerState,
    /// Active configuration
    settings: Settings,
    /// Cumulative completed work intervals
    counters: SessionCounters,
    /// Task credited with completed work intervals
    active_task: Option<TaskId>,
    /// Task collaborator
    tasks: T,
    /// Tone and notification backends
    effects: EffectDispatcher,
    /// Tick source bookkeeping
    schedule: TickSchedule,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl<T: TaskCollaborator> TimerEngine<T> {
    /// Creates an engine paused at the start of a work interval.
    ///
    /// `settings` are sanitized before use.
    pub fn new(
        settings: Settings,
        tasks: T,
        effects: EffectDispatcher,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let settings = settings.sanitized(&Settings::default());
        Self {
            state: TimerState::new(&settings),
            settings,
            counters: SessionCounters::default(),
            active_task: None,
            tasks,
            effects,
            schedule: TickSchedule::new(),
            event_tx,
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Starts or resumes the countdown.
    ///
    /// Returns false if the timer was already running.
    pub fn start(&mut self) -> bool {
        if self.state.running {
            return false;
        }

        self.transition(self.state.started());
        debug!(mode = %self.state.mode, remaining = self.state.remaining_seconds, "Timer started");
        self.emit(TimerEvent::Started);
        true
    }

    /// Pauses the countdown, keeping the remaining time.
    ///
    /// Returns false if the timer was already paused.
    pub fn pause(&mut self) -> bool {
        if !self.state.running {
            return false;
        }

        self.transition(self.state.paused());
        debug!(remaining = self.state.remaining_seconds, "Timer paused");
        self.emit(TimerEvent::Paused);
        true
    }

    /// Halts the countdown and discards the current interval's progress.
    pub fn stop(&mut self) {
        self.transition(self.state.stopped(&self.settings));
        debug!(mode = %self.state.mode, "Timer stopped");
        self.emit(TimerEvent::Stopped);
    }

    /// Returns to a paused work interval and clears the active task.
    ///
    /// Session counters are kept.
    pub fn reset(&mut self) {
        self.transition(TimerState::reset(&self.settings));
        self.active_task = None;
        debug!("Timer reset");
        self.emit(TimerEvent::Reset);
    }

    /// Switches to `target` at its full duration, running if `auto_start`.
    pub fn switch_mode(&mut self, target: TimerMode, auto_start: bool) {
        self.transition(self.state.switched(target, auto_start, &self.settings));
        debug!(mode = %target, auto_start, "Mode switched");
        self.emit(TimerEvent::ModeSwitched {
            mode: target,
            auto_start,
        });
    }

    /// Replaces the settings.
    ///
    /// While paused, a changed duration for the current mode restarts the
    /// interval at the new duration. A running countdown is left untouched.
    pub fn update_settings(&mut self, settings: Settings) {
        let previous = std::mem::take(&mut self.settings);
        let settings = settings.sanitized(&previous);
        self.state = self.state.reconfigured(&previous, &settings);
        self.settings = settings;
        self.schedule.reconcile(self.state.is_tick_due());
        debug!(settings = ?self.settings, "Settings updated");
        self.emit(TimerEvent::SettingsUpdated);
    }

    /// Applies a partial settings change.
    pub fn apply_update(&mut self, update: &SettingsUpdate) {
        let settings = self.settings.apply(update);
        self.update_settings(settings);
    }

    /// Sets or clears the task credited with completed work intervals.
    pub fn designate_active_task(&mut self, task: Option<TaskId>) {
        debug!(?task, "Active task designated");
        self.active_task = task;
    }

    // ------------------------------------------------------------------------
    // Ticks
    // ------------------------------------------------------------------------

    /// Applies a tick from the tick source.
    ///
    /// Ticks stamped with a cancelled token are ignored.
    pub fn on_tick(&mut self, token: TickToken) -> TickOutcome {
        if !self.schedule.accepts(token) {
            trace!(?token, "Stale tick ignored");
            return TickOutcome::Idle;
        }
        self.tick()
    }

    /// Counts down one second.
    ///
    /// Reaching zero runs the completion protocol exactly once.
    pub fn tick(&mut self) -> TickOutcome {
        let (next, outcome) = self.state.ticked();
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Counted => {
                self.state = next;
                self.emit_tick();
            }
            TickOutcome::Completed => {
                self.state = next;
                self.schedule.cancel();
                self.emit_tick();
                self.handle_interval_complete();
            }
        }
        outcome
    }

    /// Handles a finished interval.
    fn handle_interval_complete(&mut self) {
        let completed = self.state.mode;
        info!(mode = %completed, "Interval complete");

        self.effects.dispatch_completion(completed, &self.settings);

        match completed {
            TimerMode::Work => {
                self.state = self.state.with_work_interval_recorded();
                self.counters = self.counters.recorded();
                if let Some(task) = self.active_task {
                    self.tasks.increment_completed_intervals(task);
                }

                self.emit(TimerEvent::IntervalCompleted {
                    mode: completed,
                    completed_work_intervals: self.state.completed_work_intervals,
                });

                let next = next_mode_after_work(
                    self.state.completed_work_intervals,
                    self.settings.long_break_interval,
                );
                self.switch_mode(next, self.settings.auto_start_breaks);
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                self.emit(TimerEvent::IntervalCompleted {
                    mode: completed,
                    completed_work_intervals: self.state.completed_work_intervals,
                });
                self.switch_mode(TimerMode::Work, self.settings.auto_start_work);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Returns the current state snapshot.
    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn active_task(&self) -> Option<TaskId> {
        self.active_task
    }

    /// Returns the elapsed share of the current interval, 0 to 100.
    pub fn progress_percent(&self) -> f64 {
        self.state.progress_percent(&self.settings)
    }

    pub fn tasks(&self) -> &T {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut T {
        &mut self.tasks
    }

    /// Returns the token the tick source should deliver, if any.
    pub fn tick_token(&self) -> Option<TickToken> {
        self.schedule.active()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Replaces the state from a command, superseding the tick source.
    fn transition(&mut self, next: TimerState) {
        self.state = next;
        self.schedule.cancel();
        self.schedule.reconcile(self.state.is_tick_due());
    }

    fn emit_tick(&self) {
        self.emit(TimerEvent::Tick {
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::notification::{MockNotifier, Notifier};
    use crate::sound::{MockTonePlayer, TonePlayer};
    use crate::tasks::TaskList;

    /// Records every credited task id.
    #[derive(Debug, Default)]
    struct RecordingTasks {
        credited: Vec<TaskId>,
    }

    impl TaskCollaborator for RecordingTasks {
        fn increment_completed_intervals(&mut self, id: TaskId) {
            self.credited.push(id);
        }
    }

    fn create_engine_with(
        settings: Settings,
    ) -> (
        TimerEngine<RecordingTasks>,
        mpsc::UnboundedReceiver<TimerEvent>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(
            settings,
            RecordingTasks::default(),
            EffectDispatcher::silent(),
            tx,
        );
        (engine, rx)
    }

    fn create_engine() -> (
        TimerEngine<RecordingTasks>,
        mpsc::UnboundedReceiver<TimerEvent>,
    ) {
        create_engine_with(Settings::default())
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Ticks until the current interval completes. Starts the timer if needed.
    fn run_interval<T: TaskCollaborator>(engine: &mut TimerEngine<T>) -> TimerMode {
        let mode = engine.state().mode;
        engine.start();
        while engine.tick() != TickOutcome::Completed {}
        mode
    }

    // ------------------------------------------------------------------------
    // Command Tests
    // ------------------------------------------------------------------------

    mod command_tests {
        use super::*;

        #[test]
        fn test_initial_state() {
            let (engine, _rx) = create_engine();
            let state = engine.state();

            assert_eq!(state.mode, TimerMode::Work);
            assert!(!state.running);
            assert_eq!(state.remaining_seconds, 1500);
            assert_eq!(state.completed_work_intervals, 0);
            assert_eq!(engine.tick_token(), None);
        }

        #[test]
        fn test_start_arms_tick_source() {
            let (mut engine, mut rx) = create_engine();

            assert!(engine.start());
            assert!(engine.state().running);
            assert!(engine.tick_token().is_some());
            assert_eq!(rx.try_recv().unwrap(), TimerEvent::Started);
        }

        #[test]
        fn test_start_while_running_is_noop() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            let token = engine.tick_token();
            drain(&mut rx);

            assert!(!engine.start());
            assert_eq!(engine.tick_token(), token);
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_pause_while_paused_is_noop() {
            let (mut engine, mut rx) = create_engine();

            assert!(!engine.pause());
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_pause_then_start_keeps_remaining() {
            let (mut engine, _rx) = create_engine();
            engine.start();
            engine.tick();
            engine.tick();
            let remaining = engine.state().remaining_seconds;

            assert!(engine.pause());
            assert_eq!(engine.tick_token(), None);
            assert!(engine.start());
            assert_eq!(engine.state().remaining_seconds, remaining);
        }

        #[test]
        fn test_stop_discards_progress_keeps_mode() {
            let (mut engine, mut rx) = create_engine();
            engine.switch_mode(TimerMode::ShortBreak, true);
            engine.tick();
            drain(&mut rx);

            engine.stop();

            let state = engine.state();
            assert_eq!(state.mode, TimerMode::ShortBreak);
            assert!(!state.running);
            assert_eq!(state.remaining_seconds, 300);
            assert_eq!(engine.tick_token(), None);
            assert_eq!(rx.try_recv().unwrap(), TimerEvent::Stopped);
        }

        #[test]
        fn test_reset_from_any_state() {
            let settings = Settings::default().with_work_minutes(1).with_short_break_minutes(1);
            let (mut engine, _rx) = create_engine_with(settings);
            let task = TaskId::new();
            engine.designate_active_task(Some(task));
            run_interval(&mut engine);
            engine.tick();

            let counters = engine.counters();
            engine.reset();

            let state = engine.state();
            assert_eq!(state.mode, TimerMode::Work);
            assert!(!state.running);
            assert_eq!(state.remaining_seconds, 60);
            assert_eq!(state.completed_work_intervals, 0);
            assert_eq!(engine.active_task(), None);
            assert_eq!(engine.counters(), counters);
            assert_eq!(engine.tick_token(), None);
        }

        #[test]
        fn test_switch_mode_sets_running_from_auto_start() {
            let (mut engine, mut rx) = create_engine();

            engine.switch_mode(TimerMode::LongBreak, false);
            assert_eq!(engine.state().mode, TimerMode::LongBreak);
            assert_eq!(engine.state().remaining_seconds, 900);
            assert!(!engine.state().running);

            engine.switch_mode(TimerMode::ShortBreak, true);
            assert!(engine.state().running);

            let events = drain(&mut rx);
            assert_eq!(
                events,
                vec![
                    TimerEvent::ModeSwitched {
                        mode: TimerMode::LongBreak,
                        auto_start: false
                    },
                    TimerEvent::ModeSwitched {
                        mode: TimerMode::ShortBreak,
                        auto_start: true
                    },
                ]
            );
        }

        #[test]
        fn test_dropped_receiver_does_not_affect_engine() {
            let (mut engine, rx) = create_engine();
            drop(rx);

            assert!(engine.start());
            assert_eq!(engine.tick(), TickOutcome::Counted);
        }
    }

    // ------------------------------------------------------------------------
    // Tick Tests
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_while_paused_is_idle() {
            let (mut engine, mut rx) = create_engine();

            assert_eq!(engine.tick(), TickOutcome::Idle);
            assert_eq!(engine.state().remaining_seconds, 1500);
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_tick_decrements_by_one() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            drain(&mut rx);

            for expected in (1490..1500).rev() {
                assert_eq!(engine.tick(), TickOutcome::Counted);
                assert_eq!(engine.state().remaining_seconds, expected);
            }
            assert_eq!(
                drain(&mut rx).last(),
                Some(&TimerEvent::Tick {
                    remaining_seconds: 1490
                })
            );
        }

        #[test]
        fn test_full_work_interval_completes_once() {
            let (mut engine, _rx) = create_engine();
            engine.start();

            let completions = (0..1500)
                .map(|_| engine.tick())
                .filter(|outcome| *outcome == TickOutcome::Completed)
                .count();

            assert_eq!(completions, 1);
            assert_eq!(engine.state().completed_work_intervals, 1);
            assert_eq!(engine.counters(), SessionCounters { today: 1, total: 1 });
            assert_eq!(engine.state().mode, TimerMode::ShortBreak);
        }

        #[test]
        fn test_completion_without_auto_start_halts() {
            let settings = Settings {
                auto_start_breaks: false,
                ..Settings::default().with_work_minutes(1)
            };
            let (mut engine, _rx) = create_engine_with(settings);
            run_interval(&mut engine);

            assert!(!engine.state().running);
            assert_eq!(engine.tick_token(), None);
            assert_eq!(engine.tick(), TickOutcome::Idle);
            assert_eq!(engine.state().remaining_seconds, 300);
        }

        #[test]
        fn test_break_completion_returns_to_work() {
            let settings = Settings::default().with_short_break_minutes(1);
            let (mut engine, mut rx) = create_engine_with(settings);
            engine.switch_mode(TimerMode::ShortBreak, true);
            drain(&mut rx);

            run_interval(&mut engine);

            let state = engine.state();
            assert_eq!(state.mode, TimerMode::Work);
            assert!(!state.running);
            assert_eq!(state.completed_work_intervals, 0);
            assert_eq!(engine.counters(), SessionCounters::default());

            let events = drain(&mut rx);
            assert!(events.contains(&TimerEvent::IntervalCompleted {
                mode: TimerMode::ShortBreak,
                completed_work_intervals: 0
            }));
            assert_eq!(
                events.last(),
                Some(&TimerEvent::ModeSwitched {
                    mode: TimerMode::Work,
                    auto_start: false
                })
            );
        }

        #[test]
        fn test_long_break_every_fourth_completion() {
            let settings = Settings::default()
                .with_work_minutes(1)
                .with_short_break_minutes(1)
                .with_long_break_minutes(1);
            let (mut engine, _rx) = create_engine_with(settings);

            let mut breaks = Vec::new();
            for _ in 0..8 {
                assert_eq!(run_interval(&mut engine), TimerMode::Work);
                breaks.push(engine.state().mode);
                assert!(run_interval(&mut engine).is_break());
            }

            use TimerMode::{LongBreak as L, ShortBreak as S};
            assert_eq!(breaks, vec![S, S, S, L, S, S, S, L]);
            assert_eq!(engine.state().completed_work_intervals, 8);
            assert_eq!(engine.counters().total, 8);
        }
    }

    // ------------------------------------------------------------------------
    // Tick Source Tests
    // ------------------------------------------------------------------------

    mod tick_source_tests {
        use super::*;

        #[test]
        fn test_stale_token_after_pause_resume() {
            let (mut engine, _rx) = create_engine();
            engine.start();
            let stale = engine.tick_token().unwrap();
            engine.pause();
            engine.start();
            let fresh = engine.tick_token().unwrap();

            assert_ne!(stale, fresh);
            assert_eq!(engine.on_tick(stale), TickOutcome::Idle);
            assert_eq!(engine.state().remaining_seconds, 1500);
            assert_eq!(engine.on_tick(fresh), TickOutcome::Counted);
            assert_eq!(engine.state().remaining_seconds, 1499);
        }

        #[test]
        fn test_switch_mode_cancels_pending_tick() {
            let (mut engine, _rx) = create_engine();
            engine.start();
            let stale = engine.tick_token().unwrap();

            engine.switch_mode(TimerMode::ShortBreak, true);

            assert_eq!(engine.on_tick(stale), TickOutcome::Idle);
            assert_eq!(engine.state().remaining_seconds, 300);
        }

        #[test]
        fn test_completion_rearms_for_auto_started_break() {
            let settings = Settings::default().with_work_minutes(1);
            let (mut engine, _rx) = create_engine_with(settings);
            engine.start();
            let work_token = engine.tick_token().unwrap();
            while engine.on_tick(work_token) != TickOutcome::Completed {}

            let break_token = engine.tick_token().unwrap();
            assert_ne!(work_token, break_token);
            assert_eq!(engine.on_tick(work_token), TickOutcome::Idle);
            assert_eq!(engine.on_tick(break_token), TickOutcome::Counted);
        }

        #[test]
        fn test_token_stable_across_counted_ticks() {
            let (mut engine, _rx) = create_engine();
            engine.start();
            let token = engine.tick_token();
            engine.tick();
            engine.tick();

            assert_eq!(engine.tick_token(), token);
        }
    }

    // ------------------------------------------------------------------------
    // Settings Tests
    // ------------------------------------------------------------------------

    mod settings_tests {
        use super::*;

        #[test]
        fn test_reconfigure_while_paused_applies_immediately() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            engine.tick();
            engine.pause();
            drain(&mut rx);

            engine.update_settings(Settings::default().with_work_minutes(50));

            assert_eq!(engine.state().remaining_seconds, 3000);
            assert_eq!(rx.try_recv().unwrap(), TimerEvent::SettingsUpdated);
        }

        #[test]
        fn test_reconfigure_while_running_keeps_countdown() {
            let (mut engine, _rx) = create_engine();
            engine.start();
            engine.tick();
            let token = engine.tick_token();

            engine.update_settings(Settings::default().with_work_minutes(10));

            assert_eq!(engine.state().remaining_seconds, 1499);
            assert_eq!(engine.tick_token(), token);

            engine.stop();
            assert_eq!(engine.state().remaining_seconds, 600);
        }

        #[test]
        fn test_reconfigure_other_mode_while_paused_restores_full_work() {
            let (mut engine, _rx) = create_engine();
            engine.start();
            for _ in 0..100 {
                engine.tick();
            }
            engine.pause();
            assert_eq!(engine.state().remaining_seconds, 1400);

            engine.update_settings(Settings::default().with_short_break_minutes(10));

            assert_eq!(engine.state().mode, TimerMode::Work);
            assert_eq!(engine.state().remaining_seconds, 1500);
            assert!(engine.tick_token().is_none());
        }

        #[test]
        fn test_invalid_settings_are_clamped() {
            let (mut engine, _rx) = create_engine();

            engine.update_settings(Settings {
                work_minutes: 0,
                long_break_interval: 1,
                sound_volume: f32::NAN,
                ..Settings::default()
            });

            assert_eq!(engine.settings().work_minutes, 1);
            assert_eq!(engine.settings().long_break_interval, 2);
            assert_eq!(engine.settings().sound_volume, 0.5);
            assert_eq!(engine.state().remaining_seconds, 60);
        }

        #[test]
        fn test_apply_partial_update() {
            let (mut engine, _rx) = create_engine();

            engine.apply_update(&SettingsUpdate {
                short_break_minutes: Some(7),
                auto_start_work: Some(true),
                ..SettingsUpdate::default()
            });

            assert_eq!(engine.settings().short_break_minutes, 7);
            assert!(engine.settings().auto_start_work);
            assert_eq!(engine.settings().work_minutes, 25);
        }

        #[test]
        fn test_progress_percent() {
            let settings = Settings::default().with_work_minutes(1);
            let (mut engine, _rx) = create_engine_with(settings);
            assert_eq!(engine.progress_percent(), 0.0);

            engine.start();
            for _ in 0..30 {
                engine.tick();
            }
            assert!((engine.progress_percent() - 50.0).abs() < f64::EPSILON);
        }
    }

    // ------------------------------------------------------------------------
    // Collaborator Tests
    // ------------------------------------------------------------------------

    mod collaborator_tests {
        use super::*;

        #[test]
        fn test_active_task_credited_once_per_work_interval() {
            let settings = Settings::default().with_work_minutes(1);
            let (mut engine, _rx) = create_engine_with(settings);
            let task = TaskId::new();
            let other = TaskId::new();
            engine.designate_active_task(Some(task));

            run_interval(&mut engine);

            assert_eq!(engine.tasks().credited, vec![task]);
            assert!(!engine.tasks().credited.contains(&other));
        }

        #[test]
        fn test_break_completion_credits_nothing() {
            let settings = Settings::default().with_short_break_minutes(1);
            let (mut engine, _rx) = create_engine_with(settings);
            engine.designate_active_task(Some(TaskId::new()));
            engine.switch_mode(TimerMode::ShortBreak, true);

            run_interval(&mut engine);

            assert!(engine.tasks().credited.is_empty());
        }

        #[test]
        fn test_no_active_task_credits_nothing() {
            let settings = Settings::default().with_work_minutes(1);
            let (mut engine, _rx) = create_engine_with(settings);

            run_interval(&mut engine);

            assert!(engine.tasks().credited.is_empty());
        }

        #[test]
        fn test_task_list_collaborator() {
            let (tx, _rx) = mpsc::unbounded_channel();
            let mut engine = TimerEngine::new(
                Settings::default().with_work_minutes(1),
                TaskList::new(),
                EffectDispatcher::silent(),
                tx,
            );
            let task = engine.tasks_mut().add("write report").unwrap();
            engine.designate_active_task(Some(task));

            run_interval(&mut engine);

            assert_eq!(engine.tasks().get(task).unwrap().spent_intervals, 1);
        }
    }

    // ------------------------------------------------------------------------
    // Effect Tests
    // ------------------------------------------------------------------------

    mod effect_tests {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::{mpsc as std_mpsc, Mutex};
        use std::time::{Duration, Instant};

        use super::*;
        use crate::notification::{NotificationContent, NotificationError, NotificationPermission};

        /// Notifier whose `show` blocks until released, like a hung
        /// notification service.
        struct GatedNotifier {
            gate: Mutex<std_mpsc::Receiver<()>>,
            shown: AtomicUsize,
        }

        impl Notifier for GatedNotifier {
            fn permission(&self) -> NotificationPermission {
                NotificationPermission::Granted
            }

            fn request_permission(&self) -> Result<NotificationPermission, NotificationError> {
                Ok(NotificationPermission::Granted)
            }

            fn show(&self, _content: &NotificationContent) -> Result<(), NotificationError> {
                let _ = self
                    .gate
                    .lock()
                    .unwrap()
                    .recv_timeout(Duration::from_secs(5));
                self.shown.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        #[tokio::test]
        async fn test_blocked_notifier_does_not_delay_completion() {
            let (release, gate) = std_mpsc::channel();
            let notifier = Arc::new(GatedNotifier {
                gate: Mutex::new(gate),
                shown: AtomicUsize::new(0),
            });
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut engine = TimerEngine::new(
                Settings::default().with_work_minutes(1),
                RecordingTasks::default(),
                EffectDispatcher::new(None, Some(notifier.clone() as Arc<dyn Notifier>)),
                tx,
            );

            let started = Instant::now();
            run_interval(&mut engine);
            assert!(started.elapsed() < Duration::from_secs(1));

            assert_eq!(engine.state().mode, TimerMode::ShortBreak);
            assert_eq!(engine.state().completed_work_intervals, 1);
            let mut completed = false;
            while let Ok(event) = rx.try_recv() {
                completed |= matches!(event, TimerEvent::IntervalCompleted { .. });
            }
            assert!(completed);
            assert_eq!(notifier.shown.load(Ordering::SeqCst), 0);

            release.send(()).unwrap();
            for _ in 0..200 {
                if notifier.shown.load(Ordering::SeqCst) == 1 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            assert_eq!(notifier.shown.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_completion_dispatches_effects() {
            let player = Arc::new(MockTonePlayer::new());
            let notifier = Arc::new(MockNotifier::new());
            let (tx, _rx) = mpsc::unbounded_channel();
            let mut engine = TimerEngine::new(
                Settings::default().with_work_minutes(1),
                RecordingTasks::default(),
                EffectDispatcher::new(
                    Some(player.clone() as Arc<dyn TonePlayer>),
                    Some(notifier.clone() as Arc<dyn Notifier>),
                ),
                tx,
            );

            run_interval(&mut engine);

            assert_eq!(player.play_count(), 2);
            assert_eq!(notifier.shown().len(), 1);
        }

        #[test]
        fn test_failing_effects_do_not_change_state() {
            let player = Arc::new(MockTonePlayer::new());
            player.set_should_fail(true);
            let notifier = Arc::new(MockNotifier::new());
            notifier.set_should_fail(true);
            let (tx, _rx) = mpsc::unbounded_channel();
            let mut engine = TimerEngine::new(
                Settings::default().with_work_minutes(1),
                RecordingTasks::default(),
                EffectDispatcher::new(
                    Some(player as Arc<dyn TonePlayer>),
                    Some(notifier as Arc<dyn Notifier>),
                ),
                tx,
            );

            run_interval(&mut engine);

            assert_eq!(engine.state().mode, TimerMode::ShortBreak);
            assert_eq!(engine.state().completed_work_intervals, 1);
        }
    }
}
