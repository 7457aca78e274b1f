use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sound::SoundEffect;
use crate::task::TaskId;
use crate::timer::TimerMode;

/// Every state change in the engine produces an Event.
/// The session runtime forwards them to whoever is listening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. Fires exactly once per countdown.
    TimerCompleted {
        mode: TimerMode,
        /// Task credited with a pomodoro, if any.
        credited_task: Option<TaskId>,
        /// Sound requested for this completion (`None` when muted).
        sound: Option<SoundEffect>,
        at: DateTime<Utc>,
    },
    TaskAdded {
        id: TaskId,
        title: String,
        estimated_pomodoros: u32,
        became_active: bool,
        at: DateTime<Utc>,
    },
    TaskCompletionToggled {
        id: TaskId,
        completed: bool,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        id: TaskId,
        was_active: bool,
        at: DateTime<Utc>,
    },
    ActiveTaskChanged {
        id: Option<TaskId>,
        at: DateTime<Utc>,
    },
    PomodoroCredited {
        id: TaskId,
        actual_pomodoros: u32,
        at: DateTime<Utc>,
    },
    DurationsChanged {
        focus: u32,
        short_break: u32,
        long_break: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SoundToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerReset { .. } => "timer_reset",
            Event::ModeSwitched { .. } => "mode_switched",
            Event::TimerCompleted { .. } => "timer_completed",
            Event::TaskAdded { .. } => "task_added",
            Event::TaskCompletionToggled { .. } => "task_completion_toggled",
            Event::TaskDeleted { .. } => "task_deleted",
            Event::ActiveTaskChanged { .. } => "active_task_changed",
            Event::PomodoroCredited { .. } => "pomodoro_credited",
            Event::DurationsChanged { .. } => "durations_changed",
            Event::SoundToggled { .. } => "sound_toggled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_serialized_tag() {
        let event = Event::TimerCompleted {
            mode: TimerMode::Focus,
            credited_task: None,
            sound: Some(SoundEffect::Success),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.kind());
        assert_eq!(json["mode"], "focus");
        assert_eq!(json["sound"], "success");
    }
}
