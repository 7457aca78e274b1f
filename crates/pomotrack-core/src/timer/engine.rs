//! Timer engine implementation.
//!
//! The engine is a plain state machine with no clock of its own. Time only
//! moves when the caller feeds it a [`TimerEngine::tick`], one per elapsed
//! second, so tests can drive it without waiting.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Completed)
//! Paused -> Running
//! Completed -> Idle   (only via reset or switch_mode)
//! ```
//!
//! ## Usage
//!
//! ```
//! use pomotrack_core::timer::TimerEngine;
//!
//! let mut engine = TimerEngine::default();
//! engine.add_task("Write spec", 1);
//! engine.start();
//! for _ in 0..25 * 60 {
//!     engine.tick();
//! }
//! assert!(!engine.is_running());
//! assert_eq!(engine.tasks().as_slice()[0].actual_pomodoros, 1);
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::{ModeDurations, TimerMode};
use crate::events::Event;
use crate::sound::SoundEffect;
use crate::task::{Task, TaskId, TaskList};

/// Countdown state for the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub mode: TimerMode,
    /// Never exceeds the configured duration of `mode`.
    pub seconds_remaining: u64,
    pub is_running: bool,
}

/// Display phase derived from [`TimerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Counters for the lifetime of one engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    /// Focus countdowns that ran to zero.
    pub completed_focus: u32,
    /// Seconds counted down while in focus mode.
    pub focused_secs: u64,
}

impl SessionStats {
    pub fn focused_hours(&self) -> f64 {
        self.focused_secs as f64 / 3600.0
    }
}

/// Serializable view of the whole engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub mode: TimerMode,
    pub mode_label: String,
    pub phase: TimerPhase,
    pub seconds_remaining: u64,
    pub total_seconds: u64,
    pub clock: String,
    pub progress_pct: f64,
    pub is_running: bool,
    pub active_task: Option<TaskId>,
    pub sound_enabled: bool,
    pub durations: ModeDurations,
    pub tasks: TaskList,
    pub stats: SessionStats,
}

/// Core timer/task engine.
///
/// Owns the task list and holds a non-owning reference (by id) to the
/// active task.
#[derive(Debug, Clone, Serialize)]
pub struct TimerEngine {
    durations: ModeDurations,
    state: TimerState,
    tasks: TaskList,
    active_task: Option<TaskId>,
    sound_enabled: bool,
    stats: SessionStats,
}

impl TimerEngine {
    /// Create an engine in focus mode, idle, with a full countdown.
    pub fn new(durations: ModeDurations) -> Self {
        let mode = TimerMode::Focus;
        Self {
            state: TimerState {
                mode,
                seconds_remaining: durations.seconds(mode),
                is_running: false,
            },
            durations,
            tasks: TaskList::new(),
            active_task: None,
            sound_enabled: true,
            stats: SessionStats::default(),
        }
    }

    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.state.seconds_remaining
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn durations(&self) -> ModeDurations {
        self.durations
    }

    /// Full length of the current mode in seconds.
    pub fn total_secs(&self) -> u64 {
        self.durations.seconds(self.state.mode)
    }

    pub fn phase(&self) -> TimerPhase {
        if self.state.is_running {
            TimerPhase::Running
        } else if self.state.seconds_remaining == 0 {
            TimerPhase::Completed
        } else if self.state.seconds_remaining >= self.total_secs() {
            TimerPhase::Idle
        } else {
            TimerPhase::Paused
        }
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.state.seconds_remaining);
        elapsed as f64 / total as f64
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn active_task_id(&self) -> Option<&TaskId> {
        self.active_task.as_ref()
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.active_task.as_ref().and_then(|id| self.tasks.get(id))
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.state.mode,
            mode_label: self.state.mode.label().to_string(),
            phase: self.phase(),
            seconds_remaining: self.state.seconds_remaining,
            total_seconds: self.total_secs(),
            clock: format_clock(self.state.seconds_remaining),
            progress_pct: self.progress() * 100.0,
            is_running: self.state.is_running,
            active_task: self.active_task.clone(),
            sound_enabled: self.sound_enabled,
            durations: self.durations,
            tasks: self.tasks.clone(),
            stats: self.stats,
        }
    }

    // ── Timer commands ───────────────────────────────────────────────

    /// Change mode, stop the countdown and re-arm it to the new mode's length.
    pub fn switch_mode(&mut self, mode: TimerMode) -> Event {
        let from = self.state.mode;
        self.state = TimerState {
            mode,
            seconds_remaining: self.durations.seconds(mode),
            is_running: false,
        };
        Event::ModeSwitched {
            from,
            to: mode,
            remaining_secs: self.state.seconds_remaining,
            at: Utc::now(),
        }
    }

    /// Start counting down. No-op when already running or when the
    /// countdown has reached zero (reset or switch mode first).
    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running || self.state.seconds_remaining == 0 {
            return None;
        }
        self.state.is_running = true;
        Some(Event::TimerStarted {
            mode: self.state.mode,
            remaining_secs: self.state.seconds_remaining,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        Some(Event::TimerPaused {
            mode: self.state.mode,
            remaining_secs: self.state.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Start when stopped, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.state.is_running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Stop and refill the countdown without changing mode.
    pub fn reset(&mut self) -> Event {
        self.state.is_running = false;
        self.state.seconds_remaining = self.total_secs();
        Event::TimerReset {
            mode: self.state.mode,
            remaining_secs: self.state.seconds_remaining,
            at: Utc::now(),
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Ignored unless running. The tick that reaches zero stops the timer
    /// and returns the completion events; later ticks return nothing, so a
    /// countdown completes exactly once.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.state.is_running {
            return Vec::new();
        }
        if self.state.seconds_remaining > 0 {
            self.state.seconds_remaining -= 1;
            if self.state.mode.is_focus() {
                self.stats.focused_secs += 1;
            }
        }
        if self.state.seconds_remaining > 0 {
            return Vec::new();
        }
        self.complete()
    }

    /// Replace the configured durations. An idle or completed countdown
    /// refills to the new length; a running or paused one is clamped.
    pub fn set_durations(&mut self, durations: ModeDurations) -> Event {
        let rearm = matches!(self.phase(), TimerPhase::Idle | TimerPhase::Completed);
        self.durations = durations;
        let total = self.total_secs();
        self.state.seconds_remaining = if rearm {
            total
        } else {
            self.state.seconds_remaining.min(total)
        };
        Event::DurationsChanged {
            focus: durations.focus,
            short_break: durations.short_break,
            long_break: durations.long_break,
            remaining_secs: self.state.seconds_remaining,
            at: Utc::now(),
        }
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) -> Option<Event> {
        if self.sound_enabled == enabled {
            return None;
        }
        self.sound_enabled = enabled;
        Some(Event::SoundToggled {
            enabled,
            at: Utc::now(),
        })
    }

    // ── Task commands ────────────────────────────────────────────────

    /// Append a task. The first task added while nothing is active
    /// becomes the active task. Blank titles are ignored.
    pub fn add_task(&mut self, title: &str, estimated_pomodoros: u32) -> Option<Event> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let task = self.tasks.push(Task::new(title, estimated_pomodoros));
        let id = task.id.clone();
        let estimated_pomodoros = task.estimated_pomodoros;
        let became_active = self.active_task.is_none();
        if became_active {
            self.active_task = Some(id.clone());
        }
        Some(Event::TaskAdded {
            id,
            title: title.to_string(),
            estimated_pomodoros,
            became_active,
            at: Utc::now(),
        })
    }

    pub fn toggle_task_completion(&mut self, id: &TaskId) -> Option<Event> {
        let completed = self.tasks.toggle_completion(id)?;
        Some(Event::TaskCompletionToggled {
            id: id.clone(),
            completed,
            at: Utc::now(),
        })
    }

    /// Remove a task, clearing the active reference if it pointed here.
    pub fn delete_task(&mut self, id: &TaskId) -> Option<Event> {
        self.tasks.remove(id)?;
        let was_active = self.active_task.as_ref() == Some(id);
        if was_active {
            self.active_task = None;
        }
        Some(Event::TaskDeleted {
            id: id.clone(),
            was_active,
            at: Utc::now(),
        })
    }

    pub fn set_active_task(&mut self, id: &TaskId) -> Option<Event> {
        if !self.tasks.contains(id) || self.active_task.as_ref() == Some(id) {
            return None;
        }
        self.active_task = Some(id.clone());
        Some(Event::ActiveTaskChanged {
            id: Some(id.clone()),
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Vec<Event> {
        self.state.is_running = false;
        let mode = self.state.mode;
        let mut credited = None;
        if mode.is_focus() {
            self.stats.completed_focus += 1;
            if let Some(id) = self.active_task.clone() {
                if let Some(actual) = self.tasks.credit_pomodoro(&id) {
                    credited = Some((id, actual));
                }
            }
        }
        let at = Utc::now();
        let mut events = vec![Event::TimerCompleted {
            mode,
            credited_task: credited.as_ref().map(|(id, _)| id.clone()),
            sound: self.sound_enabled.then_some(SoundEffect::Success),
            at,
        }];
        if let Some((id, actual_pomodoros)) = credited {
            events.push(Event::PomodoroCredited {
                id,
                actual_pomodoros,
                at,
            });
        }
        events
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(ModeDurations::default())
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
