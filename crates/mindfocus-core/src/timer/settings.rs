use serde::{Deserialize, Serialize};

use super::TimerMode;

/// User-tunable timer durations and behavior flags.
///
/// Persisted as its own store slice; every field carries a serde default so
/// older persisted shapes keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Focus session length in minutes.
    #[serde(default = "default_focus_min")]
    pub focus_min: u64,
    /// Short break length in minutes.
    #[serde(default = "default_short_break_min")]
    pub short_break_min: u64,
    /// Long break length in minutes.
    #[serde(default = "default_long_break_min")]
    pub long_break_min: u64,
    /// A long break replaces the short break after this many focus sessions.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    #[serde(default = "default_true")]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_focus: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

fn default_focus_min() -> u64 {
    25
}
fn default_short_break_min() -> u64 {
    5
}
fn default_long_break_min() -> u64 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_min: default_focus_min(),
            short_break_min: default_short_break_min(),
            long_break_min: default_long_break_min(),
            long_break_interval: default_long_break_interval(),
            auto_start_breaks: true,
            auto_start_focus: false,
            sound_enabled: true,
            notifications_enabled: true,
        }
    }
}

impl TimerSettings {
    /// Configured duration for a mode, in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        let minutes = match mode {
            TimerMode::Focus => self.focus_min,
            TimerMode::ShortBreak => self.short_break_min,
            TimerMode::LongBreak => self.long_break_min,
        };
        minutes.saturating_mul(60)
    }
}
