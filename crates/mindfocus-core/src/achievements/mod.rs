//! Achievement evaluation and level progression.
//!
//! The catalog is fixed; per-user instances track progress and unlock state.
//! Evaluation runs after every session completion. An unlock is terminal:
//! `unlocked` never reverts even if the underlying progress later drops
//! (e.g. a broken streak).

mod catalog;

pub use catalog::{initial_achievements, AchievementDef, CATALOG};

use chrono::{DateTime, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Streak,
    Total,
    Daily,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// A per-user achievement instance. `unlocked_at` is set exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: AchievementCategory,
    pub requirement: u32,
    pub current: u32,
    pub unlocked: bool,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
    pub points: u32,
    pub rarity: Rarity,
}

impl From<&AchievementDef> for Achievement {
    fn from(def: &AchievementDef) -> Self {
        Self {
            id: def.id.to_string(),
            title: def.title.to_string(),
            description: def.description.to_string(),
            category: def.category,
            requirement: def.requirement,
            current: 0,
            unlocked: false,
            unlocked_at: None,
            points: def.points,
            rarity: def.rarity,
        }
    }
}

/// Aggregate gamification state, persisted as its own slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_sessions: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    pub daily_sessions: u32,
    pub total_points: u32,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
}

fn default_daily_goal() -> u32 {
    4
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_sessions: 0,
            current_streak: 0,
            longest_streak: 0,
            daily_goal: default_daily_goal(),
            daily_sessions: 0,
            total_points: 0,
            level: 1,
            experience: 0,
            experience_to_next: 100,
        }
    }
}

/// Re-run unlock checks against the current stats.
///
/// Newly crossed thresholds unlock, award their points to both the point
/// total and experience, and may trigger one or more level-ups. Returns the
/// achievements that unlocked in this call; running again with unchanged
/// stats returns an empty set.
pub fn evaluate(
    stats: &mut UserStats,
    achievements: &mut [Achievement],
    completed_at: Option<DateTime<Local>>,
) -> Vec<Achievement> {
    let mut newly = Vec::new();
    for achievement in achievements.iter_mut() {
        if let Some(current) = progress_for(achievement, stats, completed_at) {
            achievement.current = current;
        }
        if !achievement.unlocked && achievement.current >= achievement.requirement {
            achievement.unlocked = true;
            achievement.unlocked_at = Some(Utc::now());
            stats.total_points += achievement.points;
            stats.experience += achievement.points;
            apply_level_ups(stats);
            newly.push(achievement.clone());
        }
    }
    newly
}

/// Progress value for an achievement, or `None` to leave the stored value
/// untouched (one-shot specials keep their high-water mark).
fn progress_for(
    achievement: &Achievement,
    stats: &UserStats,
    completed_at: Option<DateTime<Local>>,
) -> Option<u32> {
    match achievement.category {
        AchievementCategory::Streak => Some(stats.current_streak),
        AchievementCategory::Total => Some(stats.total_sessions),
        AchievementCategory::Daily => match achievement.id.as_str() {
            "daily_goal_once" => Some(u32::from(stats.daily_sessions >= stats.daily_goal)),
            "daily_goal_week" => Some(daily_goal_streak(stats)),
            _ => None,
        },
        AchievementCategory::Special => match achievement.id.as_str() {
            "early_bird" => completed_at.and_then(|t| (t.hour() < 7).then_some(1)),
            "night_owl" => completed_at.and_then(|t| (t.hour() >= 22).then_some(1)),
            "marathon" => Some(stats.daily_sessions),
            _ => None,
        },
    }
}

/// Consecutive days the daily goal was hit. Goal hits are not yet tracked
/// per day, so this progress source always reports 0 and the achievement
/// stays locked.
fn daily_goal_streak(_stats: &UserStats) -> u32 {
    0
}

/// Carry overflow experience across as many level-ups as it covers. The
/// threshold grows by 1.2x per level, rounded down.
fn apply_level_ups(stats: &mut UserStats) {
    while stats.experience_to_next > 0 && stats.experience >= stats.experience_to_next {
        stats.level += 1;
        stats.experience -= stats.experience_to_next;
        stats.experience_to_next = (f64::from(stats.experience_to_next) * 1.2).floor() as u32;
    }
}
