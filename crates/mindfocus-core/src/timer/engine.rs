//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` once per elapsed
//! second while the timer runs.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Idle (complete)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerSettings::default());
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::TimerCompleted) when the countdown ends
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::settings::TimerSettings;
use crate::events::Event;

/// Which countdown the engine is driving. Exactly one mode is active at a
/// time; switching modes resets the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus Time",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

impl std::str::FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" | "pomodoro" => Ok(TimerMode::Focus),
            "short_break" | "short-break" | "short" => Ok(TimerMode::ShortBreak),
            "long_break" | "long-break" | "long" => Ok(TimerMode::LongBreak),
            other => Err(format!("unknown timer mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Core timer engine.
///
/// Serializable so the CLI can persist it between invocations. Commands that
/// hit an invalid transition are no-ops returning `None`; nothing here fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    mode: TimerMode,
    state: TimerState,
    /// Remaining time in seconds for the current countdown.
    remaining_secs: u64,
    /// Completed focus sessions since the engine was created. Drives
    /// long-break placement (`focus_count % long_break_interval`).
    #[serde(default)]
    focus_count: u32,
    settings: TimerSettings,
}

/// Point-in-time view of the engine for status output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub state: TimerState,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub progress: f64,
    pub focus_count: u32,
}

impl TimerEngine {
    /// Create a new engine in `Idle` with a full Focus countdown.
    pub fn new(settings: TimerSettings) -> Self {
        let remaining_secs = settings.duration_secs(TimerMode::Focus);
        Self {
            mode: TimerMode::Focus,
            state: TimerState::Idle,
            remaining_secs,
            focus_count: 0,
            settings,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn focus_count(&self) -> u32 {
        self.focus_count
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn total_secs(&self) -> u64 {
        self.settings.duration_secs(self.mode)
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            state: self.state,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            progress: self.progress(),
            focus_count: self.focus_count,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                Some(Event::TimerStarted {
                    mode: self.mode,
                    duration_secs: self.total_secs(),
                    at: Utc::now(),
                })
            }
            TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Running => None, // Already running.
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) -> Event {
        self.state = TimerState::Idle;
        self.remaining_secs = self.total_secs();
        Event::TimerReset {
            mode: self.mode,
            at: Utc::now(),
        }
    }

    pub fn switch_mode(&mut self, mode: TimerMode) -> Event {
        self.mode = mode;
        self.state = TimerState::Idle;
        self.remaining_secs = self.total_secs();
        Event::ModeSwitched {
            mode,
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Only decrements while `Running`. When the countdown reaches zero the
    /// engine transitions to `Idle` and fires `TimerCompleted` exactly once;
    /// a Focus completion also bumps `focus_count`.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = TimerState::Idle;
            if self.mode == TimerMode::Focus {
                self.focus_count += 1;
            }
            return Some(Event::TimerCompleted {
                mode: self.mode,
                at: Utc::now(),
            });
        }
        None
    }

    /// Replace the settings.
    ///
    /// While `Idle` the countdown resets to the new duration immediately.
    /// While `Running` or `Paused` the live countdown is left untouched -
    /// a settings change must never make a running timer jump.
    pub fn update_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
        if self.state == TimerState::Idle {
            self.remaining_secs = self.total_secs();
        }
    }
}
