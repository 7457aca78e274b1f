//! Async driver for the timer engine: a single actor fed by one queue, and the
//! one-second ticker it arms and disarms.

mod session;
mod ticker;

pub use session::{RunningSession, SessionBuilder, SessionHandle};
pub use ticker::{Ticker, TICK_PERIOD};
