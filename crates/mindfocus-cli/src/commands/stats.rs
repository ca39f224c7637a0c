use chrono::Local;
use clap::Subcommand;
use serde_json::json;

use super::common::{open_context, CliError};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's sessions and streak
    Today,
    /// All-time totals
    All,
    /// Per-day breakdown
    Daily {
        /// How many days back
        #[arg(long, default_value = "7")]
        days: u32,
    },
    /// Rolling 7-day windows
    Weekly {
        /// How many windows back
        #[arg(long, default_value = "4")]
        weeks: u32,
    },
    /// Current and longest streaks
    Streak,
}

pub fn run(action: StatsAction) -> Result<(), CliError> {
    let ctx = open_context()?;
    let today = Local::now().date_naive();
    let log = ctx.sessions();

    match action {
        StatsAction::Today => {
            let out = json!({
                "date": today.format("%Y-%m-%d").to_string(),
                "sessions": log.sessions_on(today),
                "daily_goal": ctx.config().goals.daily_goal,
                "current_streak": log.current_streak(today),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::All => {
            let out = json!({
                "total_sessions": log.total_sessions(),
                "total_focus_min": log.total_focus_min(),
                "current_streak": log.current_streak(today),
                "longest_streak": log.longest_streak(),
                "level": ctx.stats().level,
                "total_points": ctx.stats().total_points,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::Daily { days } => {
            let summary = log.daily_summary(today, days);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Weekly { weeks } => {
            let summary = log.weekly_summary(today, weeks);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Streak => {
            let out = json!({
                "current": log.current_streak(today),
                "longest": log.longest_streak(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
