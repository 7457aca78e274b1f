mod engine;
mod mode;
mod reducer;

pub use engine::{format_clock, SessionStats, Snapshot, TimerEngine, TimerPhase, TimerState};
pub use mode::{ModeDurations, TimerMode};
pub use reducer::{Command, TickerDirective, Transition};
