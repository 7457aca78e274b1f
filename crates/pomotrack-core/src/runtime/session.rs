//! Single-actor session driving a [`TimerEngine`].
//!
//! User commands and ticks share one queue, so every mutation happens on the
//! actor task, one input at a time. The actor owns the [`Ticker`] and applies
//! each transition's ticker directive before touching the next input.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::ticker::Ticker;
use crate::error::SessionError;
use crate::events::Event;
use crate::sound::{play_best_effort, SilentPlayer, SoundPlayer};
use crate::timer::{Command, Snapshot, TickerDirective, TimerEngine};

enum Input {
    Command {
        command: Command,
        reply: Option<oneshot::Sender<Vec<Event>>>,
    },
    Tick(u64),
    Snapshot(oneshot::Sender<Snapshot>),
    Shutdown,
}

/// Cheap, cloneable handle for talking to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: UnboundedSender<Input>,
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Command { command, .. } => f.debug_tuple("Command").field(command).finish(),
            Input::Tick(generation) => f.debug_tuple("Tick").field(generation).finish(),
            Input::Snapshot(_) => f.write_str("Snapshot"),
            Input::Shutdown => f.write_str("Shutdown"),
        }
    }
}

impl SessionHandle {
    /// Apply a command and wait for the events it produced.
    pub async fn send(&self, command: Command) -> Result<Vec<Event>, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Input::Command {
            command,
            reply: Some(reply),
        })?;
        Ok(rx.await?)
    }

    /// Queue a command without waiting for it to be applied.
    pub fn send_nowait(&self, command: Command) -> Result<(), SessionError> {
        self.tx.send(Input::Command {
            command,
            reply: None,
        })?;
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<Snapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Input::Snapshot(reply))?;
        Ok(rx.await?)
    }

    /// Ask the actor to stop after the inputs already queued.
    pub fn shutdown(&self) -> Result<(), SessionError> {
        self.tx.send(Input::Shutdown)?;
        Ok(())
    }
}

/// Configures and spawns a session actor.
pub struct SessionBuilder {
    engine: TimerEngine,
    player: Box<dyn SoundPlayer>,
    volume: u8,
}

impl SessionBuilder {
    pub fn new(engine: TimerEngine) -> Self {
        Self {
            engine,
            player: Box::new(SilentPlayer),
            volume: 50,
        }
    }

    pub fn player(mut self, player: impl SoundPlayer + 'static) -> Self {
        self.player = Box::new(player);
        self
    }

    /// Playback volume, 0..=100.
    pub fn volume(mut self, volume: u8) -> Self {
        self.volume = volume.min(100);
        self
    }

    /// Spawn the actor on the current tokio runtime.
    pub fn spawn(self) -> RunningSession {
        let (tx, inbox) = mpsc::unbounded_channel();
        let (events_tx, events) = mpsc::unbounded_channel();
        let actor = Actor {
            engine: self.engine,
            ticker: Ticker::new(),
            player: self.player,
            volume: self.volume,
            inbox_tx: tx.downgrade(),
            inbox,
            events: Some(events_tx),
        };
        let join = tokio::spawn(actor.run());
        RunningSession {
            handle: SessionHandle { tx },
            events,
            join,
        }
    }
}

/// A spawned session: its handle, its event stream and its task.
pub struct RunningSession {
    pub handle: SessionHandle,
    /// Every event the engine produces, in order, including completions
    /// caused by ticks.
    pub events: UnboundedReceiver<Event>,
    join: JoinHandle<TimerEngine>,
}

impl RunningSession {
    /// Shut the actor down and return the final engine state.
    pub async fn finish(self) -> Result<TimerEngine, SessionError> {
        // The actor may already be gone; the join result tells the story.
        let _ = self.handle.shutdown();
        Ok(self.join.await?)
    }
}

struct Actor {
    engine: TimerEngine,
    ticker: Ticker,
    player: Box<dyn SoundPlayer>,
    volume: u8,
    inbox_tx: WeakUnboundedSender<Input>,
    inbox: UnboundedReceiver<Input>,
    events: Option<UnboundedSender<Event>>,
}

impl Actor {
    async fn run(mut self) -> TimerEngine {
        while let Some(input) = self.inbox.recv().await {
            match input {
                Input::Command { command, reply } => {
                    let events = self.apply(command);
                    if let Some(reply) = reply {
                        let _ = reply.send(events);
                    }
                }
                Input::Tick(generation) => {
                    if self.ticker.accepts(generation) {
                        self.apply(Command::Tick);
                    } else {
                        tracing::trace!(generation, "dropping stale tick");
                    }
                }
                Input::Snapshot(reply) => {
                    let _ = reply.send(self.engine.snapshot());
                }
                Input::Shutdown => break,
            }
        }
        self.ticker.disarm();
        tracing::debug!("session stopped");
        self.engine
    }

    fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut transition = self.engine.dispatch(command);
        match transition.ticker {
            TickerDirective::Arm => match self.inbox_tx.upgrade() {
                Some(tx) => {
                    self.ticker.arm(tx, Input::Tick);
                }
                None => {
                    // Every handle is gone; nothing could ever stop a ticker now.
                    tracing::warn!("session has no handles left, refusing to start timer");
                    transition.events.extend(self.engine.pause());
                }
            },
            TickerDirective::Disarm => self.ticker.disarm(),
            TickerDirective::Keep => {}
        }

        if let Some(effect) = transition.sound {
            play_best_effort(self.player.as_mut(), effect, self.volume);
        }

        let listener_gone = match &self.events {
            Some(events_tx) => transition
                .events
                .iter()
                .any(|event| events_tx.send(event.clone()).is_err()),
            None => false,
        };
        if listener_gone {
            self.events = None;
        }
        transition.events
    }
}
