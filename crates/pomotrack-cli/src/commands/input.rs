//! Line commands accepted by `run`.

use pomotrack_core::{Command, ModeDurations, TimerMode};

pub const HELP: &str = "\
commands:
  start | pause | toggle | reset     control the countdown
  mode <focus|short|long>            switch mode (stops and refills the timer)
  add [est] <title...>               add a task, est pomodoros default 1
  done <task>                        toggle a task's completed flag
  rm <task>                          delete a task
  select <task>                      focus on a task
  sound <on|off>                     toggle the completion sound
  durations <focus> <short> <long>   set mode lengths in minutes
  status | tasks                     show the timer or the task list
  help | quit
<task> is a list number (1, 2, ...) or the start of a task id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOp {
    ToggleDone,
    Delete,
    Select,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Engine(Command),
    /// A task command whose reference is resolved against the live list.
    Task(TaskOp, String),
    Status,
    Tasks,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Request>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let request = match word.to_ascii_lowercase().as_str() {
        "start" => Request::Engine(Command::Start),
        "pause" => Request::Engine(Command::Pause),
        "toggle" | "t" => Request::Engine(Command::Toggle),
        "reset" => Request::Engine(Command::Reset),
        "mode" => {
            let mode = rest.parse::<TimerMode>().map_err(|e| e.to_string())?;
            Request::Engine(Command::SwitchMode(mode))
        }
        "add" => parse_add(rest)?,
        "done" => Request::Task(TaskOp::ToggleDone, task_ref(rest)?),
        "rm" | "delete" => Request::Task(TaskOp::Delete, task_ref(rest)?),
        "select" | "focus" => Request::Task(TaskOp::Select, task_ref(rest)?),
        "sound" => match rest {
            "on" => Request::Engine(Command::SetSoundEnabled(true)),
            "off" => Request::Engine(Command::SetSoundEnabled(false)),
            _ => return Err("usage: sound <on|off>".into()),
        },
        "durations" => parse_durations(rest)?,
        "status" | "s" => Request::Status,
        "tasks" | "ls" => Request::Tasks,
        "help" | "?" => Request::Help,
        "quit" | "exit" | "q" => Request::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(request))
}

fn parse_add(rest: &str) -> Result<Request, String> {
    let (estimated_pomodoros, title) = match rest.split_once(char::is_whitespace) {
        Some((first, title)) => match first.parse::<u32>() {
            Ok(est) => (est, title.trim()),
            Err(_) => (1, rest),
        },
        None => (1, rest),
    };
    if title.is_empty() {
        return Err("usage: add [est] <title...>".into());
    }
    if estimated_pomodoros == 0 {
        return Err("estimate must be at least 1".into());
    }
    Ok(Request::Engine(Command::AddTask {
        title: title.to_string(),
        estimated_pomodoros,
    }))
}

fn parse_durations(rest: &str) -> Result<Request, String> {
    const USAGE: &str = "usage: durations <focus> <short> <long>";
    let minutes = rest
        .split_whitespace()
        .map(|word| word.parse::<u32>().map_err(|_| USAGE.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    let [focus, short_break, long_break] = minutes[..] else {
        return Err(USAGE.into());
    };
    let durations =
        ModeDurations::new(focus, short_break, long_break).map_err(|e| e.to_string())?;
    Ok(Request::Engine(Command::SetDurations(durations)))
}

fn task_ref(rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        return Err("missing task number or id".into());
    }
    Ok(rest.to_string())
}
