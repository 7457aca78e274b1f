//! Reducer entry point for the engine.
//!
//! Every input, user command or clock tick alike, goes through
//! [`TimerEngine::dispatch`]. The returned [`Transition`] tells the driver
//! what to do with the outside world: which events to publish, which sound to
//! play, and whether the one-second ticker must be armed or torn down.

use super::engine::TimerEngine;
use super::mode::{ModeDurations, TimerMode};
use crate::events::Event;
use crate::sound::SoundEffect;
use crate::task::TaskId;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SwitchMode(TimerMode),
    Start,
    Pause,
    Toggle,
    Reset,
    /// One second of wall-clock time has elapsed.
    Tick,
    AddTask {
        title: String,
        estimated_pomodoros: u32,
    },
    ToggleTaskCompletion(TaskId),
    DeleteTask(TaskId),
    SetActiveTask(TaskId),
    SetDurations(ModeDurations),
    SetSoundEnabled(bool),
}

/// What the driver must do with its periodic tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerDirective {
    /// The timer just started: cancel any old ticker, then start a fresh one.
    Arm,
    /// The timer just stopped: cancel the ticker.
    Disarm,
    Keep,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub events: Vec<Event>,
    pub sound: Option<SoundEffect>,
    pub ticker: TickerDirective,
}

impl TimerEngine {
    pub fn dispatch(&mut self, command: Command) -> Transition {
        let was_running = self.is_running();
        let events: Vec<Event> = match command {
            Command::SwitchMode(mode) => vec![self.switch_mode(mode)],
            Command::Start => self.start().into_iter().collect(),
            Command::Pause => self.pause().into_iter().collect(),
            Command::Toggle => self.toggle().into_iter().collect(),
            Command::Reset => vec![self.reset()],
            Command::Tick => self.tick(),
            Command::AddTask {
                title,
                estimated_pomodoros,
            } => self.add_task(&title, estimated_pomodoros).into_iter().collect(),
            Command::ToggleTaskCompletion(id) => {
                self.toggle_task_completion(&id).into_iter().collect()
            }
            Command::DeleteTask(id) => self.delete_task(&id).into_iter().collect(),
            Command::SetActiveTask(id) => self.set_active_task(&id).into_iter().collect(),
            Command::SetDurations(durations) => vec![self.set_durations(durations)],
            Command::SetSoundEnabled(enabled) => {
                self.set_sound_enabled(enabled).into_iter().collect()
            }
        };

        let ticker = match (was_running, self.is_running()) {
            (false, true) => TickerDirective::Arm,
            (true, false) => TickerDirective::Disarm,
            _ => TickerDirective::Keep,
        };
        let sound = events.iter().find_map(|e| match e {
            Event::TimerCompleted { sound, .. } => *sound,
            _ => None,
        });
        if ticker != TickerDirective::Keep {
            tracing::debug!(?ticker, remaining = self.seconds_remaining(), "run state changed");
        }

        Transition {
            events,
            sound,
            ticker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_arms_and_pause_disarms() {
        let mut engine = TimerEngine::default();
        assert_eq!(engine.dispatch(Command::Start).ticker, TickerDirective::Arm);
        assert_eq!(engine.dispatch(Command::Start).ticker, TickerDirective::Keep);
        assert_eq!(engine.dispatch(Command::Tick).ticker, TickerDirective::Keep);
        assert_eq!(engine.dispatch(Command::Pause).ticker, TickerDirective::Disarm);
        assert_eq!(engine.dispatch(Command::Pause).ticker, TickerDirective::Keep);
    }

    #[test]
    fn reset_and_switch_disarm_a_running_timer() {
        let mut engine = TimerEngine::default();
        engine.dispatch(Command::Start);
        assert_eq!(engine.dispatch(Command::Reset).ticker, TickerDirective::Disarm);

        engine.dispatch(Command::Start);
        let t = engine.dispatch(Command::SwitchMode(TimerMode::LongBreak));
        assert_eq!(t.ticker, TickerDirective::Disarm);
        assert_eq!(engine.seconds_remaining(), 900);
    }

    #[test]
    fn final_tick_disarms_and_requests_sound() {
        let mut engine = TimerEngine::new(ModeDurations::new(1, 1, 1).unwrap());
        engine.dispatch(Command::Start);
        for _ in 0..59 {
            let t = engine.dispatch(Command::Tick);
            assert!(t.events.is_empty());
            assert_eq!(t.sound, None);
        }
        let last = engine.dispatch(Command::Tick);
        assert_eq!(last.ticker, TickerDirective::Disarm);
        assert_eq!(last.sound, Some(SoundEffect::Success));
        assert_eq!(last.events.len(), 1);
    }

    #[test]
    fn muted_completion_requests_no_sound() {
        let mut engine = TimerEngine::new(ModeDurations::new(1, 1, 1).unwrap());
        engine.dispatch(Command::SetSoundEnabled(false));
        engine.dispatch(Command::Start);
        let sounds: Vec<_> = (0..60)
            .filter_map(|_| engine.dispatch(Command::Tick).sound)
            .collect();
        assert!(sounds.is_empty());
        assert!(!engine.is_running());
    }

    #[test]
    fn task_commands_keep_ticker() {
        let mut engine = TimerEngine::default();
        engine.dispatch(Command::Start);
        let t = engine.dispatch(Command::AddTask {
            title: "Outline".into(),
            estimated_pomodoros: 2,
        });
        assert_eq!(t.ticker, TickerDirective::Keep);
        assert_eq!(t.events.len(), 1);
        let id = engine.active_task_id().cloned().unwrap();
        let t = engine.dispatch(Command::DeleteTask(id));
        assert_eq!(t.ticker, TickerDirective::Keep);
        assert!(engine.is_running());
    }
}
