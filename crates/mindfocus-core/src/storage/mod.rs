mod config;
mod store;

pub use config::{BackendConfig, Config, GoalsConfig, NotificationsConfig, StressConfig};
pub use store::Store;

use std::path::PathBuf;

/// Well-known store keys. Each one holds an independent versioned slice;
/// corrupting one never takes the others down with it.
pub mod keys {
    pub const TASKS: &str = "tasks";
    pub const SELECTED_TASK: &str = "selected_task";
    pub const TIMER_SETTINGS: &str = "timer_settings";
    pub const TIMER_ENGINE: &str = "timer_engine";
    pub const USER_STATS: &str = "user_stats";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const SESSIONS: &str = "sessions";
}

/// Returns `~/.config/mindfocus[-dev]/` based on MINDFOCUS_ENV.
///
/// Set MINDFOCUS_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MINDFOCUS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("mindfocus-dev")
    } else {
        base_dir.join("mindfocus")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
