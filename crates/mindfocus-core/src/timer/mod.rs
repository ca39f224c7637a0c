mod engine;
mod settings;

pub use engine::{TimerEngine, TimerMode, TimerSnapshot, TimerState};
pub use settings::TimerSettings;
