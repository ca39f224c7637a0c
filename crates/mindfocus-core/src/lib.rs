//! # Mindfocus Core Library
//!
//! Core business logic for the Mindfocus focus timer. The library follows a
//! CLI-first philosophy: every operation is available through the standalone
//! `mindfocus` binary, and any GUI would be a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine; the caller invokes
//!   `tick()` once per elapsed second and reacts to the completion event
//! - **Task Registry**: user tasks with an active selection and per-session
//!   completion counts
//! - **Session Log**: append-only record of completed focus sessions with
//!   streak and daily/weekly analytics
//! - **Achievements**: fixed catalog evaluated after every completion,
//!   feeding points, experience and level-ups
//! - **Stress**: pluggable reading probe, rolling-window classification and
//!   recommendations
//! - **Storage**: SQLite-backed key-value store with versioned JSON slices,
//!   TOML-based configuration
//! - **Backend client**: quiz generation, quiz submission, tutoring and
//!   best-effort emotion logging against the external HTTP service
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`FocusContext`]: owns every state slice and runs the completion
//!   pipeline (task increment, session append, achievement evaluation)
//! - [`Store`] / [`Config`]: persistence and configuration
//! - [`BackendClient`]: external HTTP service client

pub mod achievements;
pub mod api;
pub mod context;
pub mod error;
pub mod events;
pub mod notify;
pub mod session;
pub mod storage;
pub mod stress;
pub mod task;
pub mod timer;

pub use achievements::{Achievement, AchievementCategory, Rarity, UserStats};
pub use api::{BackendClient, ChatTurn, QuizQuestion, QuizResult};
pub use context::FocusContext;
pub use error::{ApiError, ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use notify::Notifier;
pub use session::{SessionLog, SessionRecord};
pub use storage::{Config, Store};
pub use stress::{SessionTag, StressLevel, StressMonitor, StressProbe, SyntheticProbe};
pub use task::{Task, TaskCategory, TaskRegistry};
pub use timer::{TimerEngine, TimerMode, TimerSettings, TimerState};
