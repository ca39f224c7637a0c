use clap::Subcommand;
use serde_json::json;

use super::common::{open_context, CliError};

#[derive(Subcommand)]
pub enum AchievementsAction {
    /// List achievements and their unlock state
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Only show unlocked achievements
        #[arg(long)]
        unlocked: bool,
    },
    /// Show level, experience and points
    Progress,
}

pub fn run(action: AchievementsAction) -> Result<(), CliError> {
    let ctx = open_context()?;

    match action {
        AchievementsAction::List { json, unlocked } => {
            let list: Vec<_> = ctx
                .achievements()
                .iter()
                .filter(|a| !unlocked || a.unlocked)
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                for a in list {
                    let mark = if a.unlocked { "x" } else { " " };
                    println!(
                        "[{mark}] {:<20} {}/{}  {}pt  {}",
                        a.title, a.current, a.requirement, a.points, a.description,
                    );
                }
            }
        }
        AchievementsAction::Progress => {
            let stats = ctx.stats();
            let unlocked = ctx.achievements().iter().filter(|a| a.unlocked).count();
            let out = json!({
                "level": stats.level,
                "experience": stats.experience,
                "experience_to_next": stats.experience_to_next,
                "total_points": stats.total_points,
                "unlocked": unlocked,
                "total": ctx.achievements().len(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
