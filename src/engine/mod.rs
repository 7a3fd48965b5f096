//! Timer engine, tick scheduling and completion effects.

mod effects;
mod ticker;
mod timer;

pub use effects::EffectDispatcher;
pub use ticker::{IntervalTicker, TickSchedule, TickToken, TICK_PERIOD};
pub use timer::{TimerEngine, TimerEvent};
