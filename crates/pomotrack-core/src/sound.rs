//! Notification sounds.
//!
//! Playback is best-effort: a missing audio daemon or sound file must never
//! interrupt the timer. Callers go through [`play_best_effort`], which logs and
//! swallows every failure.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

use crate::error::SoundError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundEffect {
    /// Chime played when a countdown finishes.
    Success,
    Click,
    Error,
}

impl SoundEffect {
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Success => "success",
            SoundEffect::Click => "click",
            SoundEffect::Error => "error",
        }
    }

    /// Candidate sound files, most specific first.
    fn files(&self) -> &'static [&'static str] {
        match self {
            SoundEffect::Success => &[
                "/usr/share/sounds/freedesktop/stereo/complete.oga",
                "/usr/share/sounds/sound-icons/guitar-11.wav",
                "/System/Library/Sounds/Glass.aiff",
            ],
            SoundEffect::Click => &[
                "/usr/share/sounds/freedesktop/stereo/button-pressed.oga",
                "/System/Library/Sounds/Tink.aiff",
            ],
            SoundEffect::Error => &[
                "/usr/share/sounds/freedesktop/stereo/dialog-error.oga",
                "/System/Library/Sounds/Basso.aiff",
            ],
        }
    }
}

pub trait SoundPlayer: Send {
    /// Play `effect` at `volume` (0..=100). Must not block until playback ends.
    fn play(&mut self, effect: SoundEffect, volume: u8) -> Result<(), SoundError>;
}

/// Play a sound, logging and discarding any failure.
///
/// Returns whether playback was started.
pub fn play_best_effort(player: &mut dyn SoundPlayer, effect: SoundEffect, volume: u8) -> bool {
    match player.play(effect, volume) {
        Ok(()) => {
            tracing::debug!(effect = effect.name(), volume, "sound started");
            true
        }
        Err(e) => {
            tracing::warn!(effect = effect.name(), error = %e, "sound playback failed");
            false
        }
    }
}

/// Plays sounds through whatever audio command the host provides.
///
/// Tries `paplay`, `aplay` and `afplay` against known system sound files and
/// rings the terminal bell when none of them is usable.
#[derive(Debug, Default)]
pub struct SystemPlayer;

impl SystemPlayer {
    pub fn new() -> Self {
        Self
    }

    fn command_for(file: &str, volume: u8) -> Vec<Command> {
        let volume = volume.min(100);
        let mut paplay = Command::new("paplay");
        // PulseAudio volume scale: 65536 == 100%.
        paplay
            .arg(format!("--volume={}", u32::from(volume) * 65536 / 100))
            .arg(file);
        let mut aplay = Command::new("aplay");
        aplay.arg("-q").arg(file);
        let mut afplay = Command::new("afplay");
        afplay
            .arg("-v")
            .arg(format!("{:.2}", f32::from(volume) / 100.0))
            .arg(file);
        if file.ends_with(".aiff") {
            vec![afplay]
        } else if file.ends_with(".wav") {
            vec![aplay, paplay]
        } else {
            vec![paplay]
        }
    }

    fn ring_bell() -> Result<(), SoundError> {
        let mut stderr = std::io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

impl SoundPlayer for SystemPlayer {
    fn play(&mut self, effect: SoundEffect, volume: u8) -> Result<(), SoundError> {
        if volume == 0 {
            return Ok(());
        }
        let mut last_err = None;
        for file in effect.files().iter().filter(|f| Path::new(f).exists()) {
            for mut cmd in Self::command_for(file, volume) {
                match cmd
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()
                {
                    Ok(mut child) => {
                        // Reap in the background so playback never blocks the caller.
                        std::thread::spawn(move || {
                            let _ = child.wait();
                        });
                        return Ok(());
                    }
                    Err(e) => last_err = Some(e),
                }
            }
        }
        if let Some(e) = last_err {
            tracing::debug!(error = %e, "no audio command available, ringing bell");
        }
        Self::ring_bell()
    }
}

/// Never makes a sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&mut self, _effect: SoundEffect, _volume: u8) -> Result<(), SoundError> {
        Ok(())
    }
}

/// Records requested effects instead of playing them.
///
/// Clones share the same log, so a test can keep one handle while the
/// session owns the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingPlayer {
    played: Arc<Mutex<Vec<SoundEffect>>>,
    fail: bool,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A player that records every request and then reports failure.
    pub fn failing() -> Self {
        Self {
            played: Arc::default(),
            fail: true,
        }
    }

    pub fn played(&self) -> Vec<SoundEffect> {
        self.played
            .lock()
            .map(|played| played.clone())
            .unwrap_or_default()
    }
}

impl SoundPlayer for RecordingPlayer {
    fn play(&mut self, effect: SoundEffect, _volume: u8) -> Result<(), SoundError> {
        if let Ok(mut played) = self.played.lock() {
            played.push(effect);
        }
        if self.fail {
            return Err(SoundError::Unavailable(format!(
                "no output device for '{}'",
                effect.name()
            )));
        }
        Ok(())
    }
}
