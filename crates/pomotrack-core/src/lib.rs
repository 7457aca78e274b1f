//! # pomotrack Core Library
//!
//! Core logic for the pomotrack Pomodoro timer: a countdown across focus,
//! short-break and long-break modes, plus a task list that is credited one
//! pomodoro each time a focus countdown finishes.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A clockless state machine. Time advances only when the
//!   caller dispatches a tick, which keeps it testable without waiting
//! - **Session Runtime**: A tokio actor that owns one engine, feeds it user
//!   commands and one-second ticks from a single queue, and owns the ticker
//! - **Sound**: Best-effort notification sounds that never fail the caller
//! - **Storage**: TOML-based configuration for durations and sound settings
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer/task state machine
//! - [`SessionBuilder`]: Spawns the async session actor
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod runtime;
pub mod sound;
pub mod storage;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, SessionError, SoundError, ValidationError};
pub use events::Event;
pub use runtime::{RunningSession, SessionBuilder, SessionHandle, Ticker};
pub use sound::{SoundEffect, SoundPlayer, SystemPlayer};
pub use storage::Config;
pub use task::{Task, TaskId, TaskList};
pub use timer::{Command, ModeDurations, Snapshot, TimerEngine, TimerMode, TimerPhase, TimerState};
