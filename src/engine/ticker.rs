//! One-second tick scheduling.
//!
//! A [`TickSchedule`] decides *whether* ticks should be delivered and stamps
//! each armed period with a [`TickToken`]. Any transition cancels the current
//! token, so a tick produced by a superseded schedule is rejected instead of
//! being applied to the new state.
//!
//! [`IntervalTicker`] is the tokio side: it follows the schedule's active token
//! and yields that token once per period.

use std::future;

use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::trace;

/// Tick period of the countdown.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identifies one armed tick schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

// ============================================================================
// TickSchedule
// ============================================================================

/// Tracks the single active tick source.
///
/// At most one token is active. Arming always yields a fresh token.
#[derive(Debug, Default)]
pub struct TickSchedule {
    generation: u64,
    armed: bool,
}

impl TickSchedule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a new schedule, superseding any previous one.
    pub fn arm(&mut self) -> TickToken {
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
        trace!(generation = self.generation, "Tick schedule armed");
        TickToken(self.generation)
    }

    /// Cancels the active schedule. Ticks stamped with it are rejected.
    pub fn cancel(&mut self) {
        if self.armed {
            trace!(generation = self.generation, "Tick schedule cancelled");
        }
        self.generation = self.generation.wrapping_add(1);
        self.armed = false;
    }

    /// Returns the active token, if any.
    pub fn active(&self) -> Option<TickToken> {
        self.armed.then_some(TickToken(self.generation))
    }

    /// Returns true if `token` belongs to the active schedule.
    pub fn accepts(&self, token: TickToken) -> bool {
        self.active() == Some(token)
    }

    /// Brings the schedule in line with `should_tick`.
    ///
    /// Arms a schedule when ticking is wanted and none is active, cancels
    /// when ticking is not wanted, and otherwise keeps the active one.
    pub fn reconcile(&mut self, should_tick: bool) -> Option<TickToken> {
        match (should_tick, self.active()) {
            (true, Some(token)) => Some(token),
            (true, None) => Some(self.arm()),
            (false, Some(_)) => {
                self.cancel();
                None
            }
            (false, None) => None,
        }
    }
}

// ============================================================================
// IntervalTicker
// ============================================================================

/// Drives a [`TickSchedule`] with a tokio interval.
///
/// The first tick of a newly armed token fires one full period after
/// arming, so a fresh start always counts a whole second.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    armed: Option<(TickToken, Interval)>,
}

impl IntervalTicker {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            armed: None,
        }
    }

    #[must_use]
    pub fn every_second() -> Self {
        Self::new(TICK_PERIOD)
    }

    /// Follows the schedule's active token.
    ///
    /// A changed token restarts the interval; `None` stops it.
    pub fn sync(&mut self, active: Option<TickToken>) {
        match (active, &self.armed) {
            (Some(token), Some((current, _))) if *current == token => {}
            (Some(token), _) => {
                let mut interval = interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.armed = Some((token, interval));
            }
            (None, _) => self.armed = None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Waits for the next tick. Never resolves while disarmed.
    pub async fn next(&mut self) -> TickToken {
        match self.armed.as_mut() {
            Some((token, interval)) => {
                interval.tick().await;
                *token
            }
            None => future::pending().await,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
