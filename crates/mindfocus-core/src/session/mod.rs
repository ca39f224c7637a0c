//! Append-only session log with streak and daily/weekly analytics.
//!
//! A record is appended exactly once per completed focus session and never
//! mutated afterwards. Dates are stored as local-calendar-day snapshots
//! (`YYYY-MM-DD`); a record whose date fails to parse is excluded from streak
//! computation but still counted in totals.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::{Task, TaskCategory};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    /// Local calendar day at completion time, `YYYY-MM-DD`.
    pub date: String,
    /// Weak reference; the task may have been deleted since.
    pub task_id: Option<String>,
    pub task_title: Option<String>,
    pub category: Option<TaskCategory>,
    pub duration_min: u64,
    pub completed: bool,
}

impl SessionRecord {
    fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// Per-day aggregate bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub sessions: u32,
    pub focus_min: u64,
    pub by_category: BTreeMap<String, u32>,
}

/// Rolling 7-day aggregate bucket, `start..=end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub sessions: u32,
    pub focus_min: u64,
    pub by_category: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    records: Vec<SessionRecord>,
}

impl SessionLog {
    pub fn new(records: Vec<SessionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    /// Total completed focus sessions, malformed dates included.
    pub fn total_sessions(&self) -> usize {
        self.records.len()
    }

    pub fn total_focus_min(&self) -> u64 {
        self.records.iter().map(|r| r.duration_min).sum()
    }

    /// Append a record for a session completed today. The task snapshot is
    /// taken at completion time so later edits or deletion leave history
    /// intact.
    pub fn record_completion(
        &mut self,
        task: Option<&Task>,
        duration_min: u64,
        today: NaiveDate,
    ) -> SessionRecord {
        let record = SessionRecord {
            id: Uuid::new_v4().to_string(),
            date: today.format(DATE_FORMAT).to_string(),
            task_id: task.map(|t| t.id.clone()),
            task_title: task.map(|t| t.title.clone()),
            category: task.map(|t| t.category),
            duration_min,
            completed: true,
        };
        self.records.push(record.clone());
        record
    }

    fn session_days(&self) -> BTreeSet<NaiveDate> {
        self.records.iter().filter_map(|r| r.day()).collect()
    }

    pub fn sessions_on(&self, day: NaiveDate) -> usize {
        let key = day.format(DATE_FORMAT).to_string();
        self.records.iter().filter(|r| r.date == key).count()
    }

    /// Consecutive days with at least one session, counting backward from
    /// `today`. Today itself may still be empty without breaking the streak;
    /// the first gap before that ends it.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        let days = self.session_days();
        let mut streak = 0;
        if days.contains(&today) {
            streak += 1;
        }
        let mut day = today - Duration::days(1);
        while days.contains(&day) {
            streak += 1;
            day -= Duration::days(1);
        }
        streak
    }

    /// Longest run of consecutive session days, including a final
    /// still-in-progress run.
    pub fn longest_streak(&self) -> u32 {
        let mut longest = 0u32;
        let mut run = 0u32;
        let mut prev: Option<NaiveDate> = None;
        for day in self.session_days() {
            run = match prev {
                Some(p) if day == p + Duration::days(1) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            prev = Some(day);
        }
        longest
    }

    /// Per-day buckets for the last `days` days, most recent last.
    pub fn daily_summary(&self, today: NaiveDate, days: u32) -> Vec<DaySummary> {
        (0..days)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(i64::from(offset));
                let key = date.format(DATE_FORMAT).to_string();
                let mut summary = DaySummary {
                    date,
                    sessions: 0,
                    focus_min: 0,
                    by_category: BTreeMap::new(),
                };
                for r in self.records.iter().filter(|r| r.date == key) {
                    summary.sessions += 1;
                    summary.focus_min += r.duration_min;
                    *summary.by_category.entry(category_key(r)).or_insert(0) += 1;
                }
                summary
            })
            .collect()
    }

    /// Rolling 7-day windows ending at `today`, most recent last.
    pub fn weekly_summary(&self, today: NaiveDate, weeks: u32) -> Vec<WeekSummary> {
        (0..weeks)
            .rev()
            .map(|offset| {
                let end = today - Duration::days(i64::from(offset) * 7);
                let start = end - Duration::days(6);
                let mut summary = WeekSummary {
                    start,
                    end,
                    sessions: 0,
                    focus_min: 0,
                    by_category: BTreeMap::new(),
                };
                for r in &self.records {
                    let Some(day) = r.day() else { continue };
                    if day >= start && day <= end {
                        summary.sessions += 1;
                        summary.focus_min += r.duration_min;
                        *summary.by_category.entry(category_key(r)).or_insert(0) += 1;
                    }
                }
                summary
            })
            .collect()
    }
}

fn category_key(record: &SessionRecord) -> String {
    record
        .category
        .map(|c| c.as_str().to_string())
        .unwrap_or_else(|| "Uncategorized".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn record_on(log: &mut SessionLog, date: NaiveDate) {
        log.record_completion(None, 25, date);
    }

    #[test]
    fn record_snapshots_task_fields() {
        let mut reg = crate::task::TaskRegistry::new();
        let task = reg.create("Essay", TaskCategory::Study, 2).unwrap();

        let mut log = SessionLog::default();
        let rec = log.record_completion(Some(&task), 25, day("2026-08-25"));
        assert_eq!(rec.date, "2026-08-25");
        assert_eq!(rec.task_title.as_deref(), Some("Essay"));
        assert_eq!(rec.category, Some(TaskCategory::Study));
        assert!(rec.completed);
        assert_eq!(log.total_sessions(), 1);
    }

    #[test]
    fn streak_counts_three_consecutive_days() {
        let today = day("2026-08-25");
        let mut log = SessionLog::default();
        record_on(&mut log, today);
        record_on(&mut log, today - Duration::days(1));
        record_on(&mut log, today - Duration::days(2));
        assert_eq!(log.current_streak(today), 3);
    }

    #[test]
    fn empty_today_does_not_break_streak() {
        let today = day("2026-08-25");
        let mut log = SessionLog::default();
        record_on(&mut log, today - Duration::days(1));
        record_on(&mut log, today - Duration::days(2));
        assert_eq!(log.current_streak(today), 2);
    }

    #[test]
    fn gap_before_yesterday_ends_streak() {
        let today = day("2026-08-25");
        let mut log = SessionLog::default();
        record_on(&mut log, today);
        record_on(&mut log, today - Duration::days(2));
        assert_eq!(log.current_streak(today), 1);
    }

    #[test]
    fn longest_streak_finds_middle_run() {
        let d = day("2026-08-01");
        let mut log = SessionLog::default();
        for offset in [0, 1, 2, 5, 6] {
            record_on(&mut log, d + Duration::days(offset));
        }
        assert_eq!(log.longest_streak(), 3);
    }

    #[test]
    fn longest_streak_defaults_to_final_run() {
        let d = day("2026-08-01");
        let mut log = SessionLog::default();
        for offset in [0, 3, 4, 5, 6] {
            record_on(&mut log, d + Duration::days(offset));
        }
        assert_eq!(log.longest_streak(), 4);
    }

    #[test]
    fn duplicate_days_count_once_for_streaks() {
        let today = day("2026-08-25");
        let mut log = SessionLog::default();
        record_on(&mut log, today);
        record_on(&mut log, today);
        assert_eq!(log.current_streak(today), 1);
        assert_eq!(log.longest_streak(), 1);
    }

    #[test]
    fn malformed_date_excluded_from_streak_but_kept_in_totals() {
        let today = day("2026-08-25");
        let mut log = SessionLog::default();
        record_on(&mut log, today);
        log.records.push(SessionRecord {
            id: "x".into(),
            date: "not-a-date".into(),
            task_id: None,
            task_title: None,
            category: None,
            duration_min: 25,
            completed: true,
        });
        assert_eq!(log.current_streak(today), 1);
        assert_eq!(log.total_sessions(), 2);
        assert_eq!(log.total_focus_min(), 50);
    }

    #[test]
    fn daily_summary_groups_by_category() {
        let today = day("2026-08-25");
        let mut reg = crate::task::TaskRegistry::new();
        let work = reg.create("w", TaskCategory::Work, 1).unwrap();
        let study = reg.create("s", TaskCategory::Study, 1).unwrap();

        let mut log = SessionLog::default();
        log.record_completion(Some(&work), 25, today);
        log.record_completion(Some(&work), 25, today);
        log.record_completion(Some(&study), 25, today);
        log.record_completion(None, 25, today - Duration::days(1));

        let summary = log.daily_summary(today, 2);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].date, today - Duration::days(1));
        assert_eq!(summary[0].sessions, 1);
        assert_eq!(summary[0].by_category.get("Uncategorized"), Some(&1));
        assert_eq!(summary[1].sessions, 3);
        assert_eq!(summary[1].focus_min, 75);
        assert_eq!(summary[1].by_category.get("Work"), Some(&2));
        assert_eq!(summary[1].by_category.get("Study"), Some(&1));
    }

    #[test]
    fn weekly_summary_uses_rolling_windows() {
        let today = day("2026-08-25");
        let mut log = SessionLog::default();
        record_on(&mut log, today); // current window
        record_on(&mut log, today - Duration::days(6)); // still current window
        record_on(&mut log, today - Duration::days(7)); // previous window

        let summary = log.weekly_summary(today, 2);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].sessions, 1);
        assert_eq!(summary[1].sessions, 2);
        assert_eq!(summary[1].start, today - Duration::days(6));
        assert_eq!(summary[1].end, today);
    }
}
