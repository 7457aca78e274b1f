//! Interactive timer session.
//!
//! Reads one command per line from stdin and prints events as they happen,
//! including completions fired by the ticker between commands. EOF ends the
//! session.

use clap::Args;
use pomotrack_core::{
    Command, Config, Event, ModeDurations, SessionBuilder, SessionHandle, SystemPlayer,
    TimerEngine,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use super::input::{parse_line, Request, TaskOp, HELP};
use super::output::Printer;

#[derive(Args)]
pub struct RunArgs {
    /// Focus length in minutes (overrides config)
    #[arg(long)]
    focus: Option<u32>,
    /// Short break length in minutes (overrides config)
    #[arg(long)]
    short_break: Option<u32>,
    /// Long break length in minutes (overrides config)
    #[arg(long)]
    long_break: Option<u32>,
    /// Disable the completion sound
    #[arg(long)]
    no_sound: bool,
    /// Print one JSON object per line instead of text
    #[arg(long)]
    json: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let base = config.durations();
    let durations = ModeDurations::new(
        args.focus.unwrap_or(base.focus),
        args.short_break.unwrap_or(base.short_break),
        args.long_break.unwrap_or(base.long_break),
    )?;
    let engine = TimerEngine::new(durations).with_sound(config.sound.enabled && !args.no_sound);
    tracing::debug!(?durations, sound = engine.sound_enabled(), "starting session");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(engine, config.volume(), Printer::new(args.json)))
}

async fn drive(
    engine: TimerEngine,
    volume: u8,
    out: Printer,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = SessionBuilder::new(engine)
        .player(SystemPlayer::new())
        .volume(volume)
        .spawn();
    let handle = session.handle.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    out.status(&handle.snapshot().await?);
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let request = match parse_line(&line) {
                    Ok(Some(request)) => request,
                    Ok(None) => continue,
                    Err(message) => {
                        out.error(&message);
                        continue;
                    }
                };
                if request == Request::Quit {
                    break;
                }
                handle_request(&handle, request, &out, &mut session.events).await?;
            }
            Some(event) = session.events.recv() => out.event(&event),
        }
    }

    let snapshot = handle.snapshot().await?;
    drain(&mut session.events, &out);
    session.finish().await?;
    out.summary(&snapshot);
    Ok(())
}

/// Print events that are already queued.
fn drain(events: &mut UnboundedReceiver<Event>, out: &Printer) {
    while let Ok(event) = events.try_recv() {
        out.event(&event);
    }
}

async fn handle_request(
    handle: &SessionHandle,
    request: Request,
    out: &Printer,
    events: &mut UnboundedReceiver<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Anything the ticker produced before this request prints first.
    drain(events, out);
    match request {
        Request::Engine(command) => {
            let produced = handle.send(command).await?;
            if produced.is_empty() {
                out.message("nothing to do");
            }
        }
        Request::Task(op, reference) => {
            let snapshot = handle.snapshot().await?;
            let Some(task) = snapshot.tasks.resolve(&reference) else {
                out.error(&format!("no such task: {reference}"));
                return Ok(());
            };
            let command = match op {
                TaskOp::ToggleDone => Command::ToggleTaskCompletion(task),
                TaskOp::Delete => Command::DeleteTask(task),
                TaskOp::Select => Command::SetActiveTask(task),
            };
            handle.send(command).await?;
        }
        Request::Status => out.status(&handle.snapshot().await?),
        Request::Tasks => out.tasks(&handle.snapshot().await?),
        Request::Help => out.message(HELP),
        Request::Quit => {}
    }
    drain(events, out);
    Ok(())
}
