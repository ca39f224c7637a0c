//! The fixed achievement catalog.
//!
//! Definitions never change at runtime; per-user instances are initialized
//! from here and persisted with their progress.

use super::{Achievement, AchievementCategory, Rarity};

pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub requirement: u32,
    pub points: u32,
    pub rarity: Rarity,
}

pub const CATALOG: &[AchievementDef] = &[
    // Streak achievements
    AchievementDef {
        id: "first_streak",
        title: "Getting Started",
        description: "Complete your first daily streak",
        category: AchievementCategory::Streak,
        requirement: 1,
        points: 10,
        rarity: Rarity::Common,
    },
    AchievementDef {
        id: "week_streak",
        title: "Week Warrior",
        description: "Maintain a 7-day focus streak",
        category: AchievementCategory::Streak,
        requirement: 7,
        points: 50,
        rarity: Rarity::Rare,
    },
    AchievementDef {
        id: "month_streak",
        title: "Monthly Master",
        description: "Maintain a 30-day focus streak",
        category: AchievementCategory::Streak,
        requirement: 30,
        points: 200,
        rarity: Rarity::Legendary,
    },
    // Total achievements
    AchievementDef {
        id: "first_ten",
        title: "Focus Beginner",
        description: "Complete 10 focus sessions",
        category: AchievementCategory::Total,
        requirement: 10,
        points: 25,
        rarity: Rarity::Common,
    },
    AchievementDef {
        id: "century_club",
        title: "Century Club",
        description: "Complete 100 focus sessions",
        category: AchievementCategory::Total,
        requirement: 100,
        points: 100,
        rarity: Rarity::Epic,
    },
    AchievementDef {
        id: "thousand_sessions",
        title: "Focus Master",
        description: "Complete 1000 focus sessions",
        category: AchievementCategory::Total,
        requirement: 1000,
        points: 500,
        rarity: Rarity::Legendary,
    },
    // Daily achievements
    AchievementDef {
        id: "daily_goal_once",
        title: "Daily Dedication",
        description: "Hit your daily goal once",
        category: AchievementCategory::Daily,
        requirement: 1,
        points: 15,
        rarity: Rarity::Common,
    },
    AchievementDef {
        id: "daily_goal_week",
        title: "Week of Focus",
        description: "Hit your daily goal 7 days in a row",
        category: AchievementCategory::Daily,
        requirement: 7,
        points: 75,
        rarity: Rarity::Rare,
    },
    // Special achievements
    AchievementDef {
        id: "early_bird",
        title: "Early Bird",
        description: "Complete a focus session before 7 AM",
        category: AchievementCategory::Special,
        requirement: 1,
        points: 30,
        rarity: Rarity::Rare,
    },
    AchievementDef {
        id: "night_owl",
        title: "Night Owl",
        description: "Complete a focus session after 10 PM",
        category: AchievementCategory::Special,
        requirement: 1,
        points: 30,
        rarity: Rarity::Rare,
    },
    AchievementDef {
        id: "marathon",
        title: "Marathon Runner",
        description: "Complete 10 focus sessions in a single day",
        category: AchievementCategory::Special,
        requirement: 10,
        points: 100,
        rarity: Rarity::Epic,
    },
];

/// Fresh per-user instances: zero progress, nothing unlocked.
pub fn initial_achievements() -> Vec<Achievement> {
    CATALOG.iter().map(Achievement::from).collect()
}
