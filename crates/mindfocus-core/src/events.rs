use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stress::StressLevel;
use crate::task::TaskCategory;
use crate::timer::TimerMode;

/// Every state change in the system produces an Event.
///
/// There is no listener registry: the [`crate::FocusContext`] returns events
/// from each operation and the CLI (or any other frontend) reacts to them.
/// Delivery is synchronous and at-most-once per emission; there is no replay
/// for late consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// The running timer reached zero. Fired exactly once per countdown.
    TimerCompleted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    /// A focus session was appended to the log.
    SessionRecorded {
        session_id: String,
        task_id: Option<String>,
        task_title: Option<String>,
        category: Option<TaskCategory>,
        duration_min: u64,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        id: String,
        title: String,
        points: u32,
        at: DateTime<Utc>,
    },
    LevelUp {
        level: u32,
        at: DateTime<Utc>,
    },
    /// Sustained high stress was detected during a focus session.
    BreathingBreakSuggested {
        level: StressLevel,
        at: DateTime<Utc>,
    },
}
