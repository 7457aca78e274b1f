use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak];

    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "shortBreak",
            TimerMode::LongBreak => "longBreak",
        }
    }

    pub fn is_focus(&self) -> bool {
        matches!(self, TimerMode::Focus)
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" => Ok(TimerMode::Focus),
            "shortbreak" | "short-break" | "short" => Ok(TimerMode::ShortBreak),
            "longbreak" | "long-break" | "long" => Ok(TimerMode::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("unknown timer mode '{other}'"),
            }),
        }
    }
}

/// Configured length of each mode, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDurations {
    pub focus: u32,
    pub short_break: u32,
    pub long_break: u32,
}

impl ModeDurations {
    /// Build a set of durations, rejecting zero-length modes.
    pub fn new(focus: u32, short_break: u32, long_break: u32) -> Result<Self, ValidationError> {
        let durations = Self {
            focus,
            short_break,
            long_break,
        };
        durations.validate()?;
        Ok(durations)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for mode in TimerMode::ALL {
            if self.minutes(mode) == 0 {
                return Err(ValidationError::InvalidValue {
                    field: mode.as_str().into(),
                    message: "duration must be a positive number of minutes".into(),
                });
            }
        }
        Ok(())
    }

    pub fn minutes(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }

    /// Mode length in seconds.
    ///
    /// Uses saturating arithmetic so oversized values cannot overflow.
    pub fn seconds(&self, mode: TimerMode) -> u64 {
        u64::from(self.minutes(mode)).saturating_mul(60)
    }
}

impl Default for ModeDurations {
    fn default() -> Self {
        Self {
            focus: 25,
            short_break: 5,
            long_break: 15,
        }
    }
}
