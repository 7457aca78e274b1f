//! Human and JSON rendering of session output.

use pomotrack_core::timer::format_clock;
use pomotrack_core::{Event, Snapshot, TimerPhase};
use serde_json::json;

pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn event(&self, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to encode event"),
            }
            return;
        }
        if let Some(line) = describe(event) {
            println!("{line}");
        }
    }

    pub fn status(&self, snap: &Snapshot) {
        if self.json {
            println!("{}", json!({ "type": "status", "status": snap }));
            return;
        }
        let phase = match snap.phase {
            TimerPhase::Idle => "ready",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Completed => "done",
        };
        println!(
            "{} {} [{}] {:.0}%",
            snap.mode_label, snap.clock, phase, snap.progress_pct
        );
        match snap
            .active_task
            .as_ref()
            .and_then(|id| snap.tasks.iter().find(|t| &t.id == id))
        {
            Some(task) => println!("working on: {}", task.title),
            None => println!("select a task to focus on"),
        }
    }

    pub fn tasks(&self, snap: &Snapshot) {
        if self.json {
            println!("{}", json!({ "type": "tasks", "tasks": snap.tasks }));
            return;
        }
        if snap.tasks.is_empty() {
            println!("no tasks yet, add one with 'add [est] <title>'");
            return;
        }
        for (i, task) in snap.tasks.iter().enumerate() {
            let marker = if snap.active_task.as_ref() == Some(&task.id) {
                '>'
            } else {
                ' '
            };
            let check = if task.completed { 'x' } else { ' ' };
            println!(
                "{marker}{:>2}. [{check}] {} {}/{}  ({})",
                i + 1,
                task.title,
                task.actual_pomodoros,
                task.estimated_pomodoros,
                task.id.short()
            );
        }
    }

    pub fn summary(&self, snap: &Snapshot) {
        if self.json {
            println!("{}", json!({ "type": "summary", "stats": snap.stats }));
            return;
        }
        println!(
            "session over: {} focus session(s), {:.1} h focused",
            snap.stats.completed_focus,
            snap.stats.focused_hours()
        );
    }

    pub fn message(&self, text: &str) {
        if self.json {
            println!("{}", json!({ "type": "message", "message": text }));
        } else {
            println!("{text}");
        }
    }

    pub fn error(&self, text: &str) {
        if self.json {
            println!("{}", json!({ "type": "error", "message": text }));
        } else {
            eprintln!("{text}");
        }
    }
}

fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::TimerStarted {
            mode,
            remaining_secs,
            ..
        } => format!(
            "{} started, {} left",
            mode.label(),
            format_clock(*remaining_secs)
        ),
        Event::TimerPaused { remaining_secs, .. } => format!(
            "paused at {}",
            format_clock(*remaining_secs)
        ),
        Event::TimerReset { mode, .. } => format!("{} reset", mode.label()),
        Event::ModeSwitched { to, remaining_secs, .. } => format!(
            "switched to {} ({})",
            to.label(),
            format_clock(*remaining_secs)
        ),
        Event::TimerCompleted { mode, .. } => format!("{} complete!", mode.label()),
        Event::PomodoroCredited {
            id,
            actual_pomodoros,
            ..
        } => format!("task {} now has {actual_pomodoros} pomodoro(s)", id.short()),
        Event::TaskAdded {
            id,
            title,
            became_active,
            ..
        } => {
            if *became_active {
                format!("added '{title}' ({}), now active", id.short())
            } else {
                format!("added '{title}' ({})", id.short())
            }
        }
        Event::TaskCompletionToggled { id, completed, .. } => {
            if *completed {
                format!("task {} done", id.short())
            } else {
                format!("task {} reopened", id.short())
            }
        }
        Event::TaskDeleted { id, was_active, .. } => {
            if *was_active {
                format!("deleted task {}, no active task", id.short())
            } else {
                format!("deleted task {}", id.short())
            }
        }
        Event::ActiveTaskChanged { id: Some(id), .. } => format!("now working on {}", id.short()),
        Event::ActiveTaskChanged { id: None, .. } => return None,
        Event::SoundToggled { enabled, .. } => {
            format!("sound {}", if *enabled { "on" } else { "off" })
        }
        Event::DurationsChanged {
            focus,
            short_break,
            long_break,
            remaining_secs,
            ..
        } => format!(
            "durations {focus}/{short_break}/{long_break} min, {} left",
            format_clock(*remaining_secs)
        ),
    };
    Some(line)
}
