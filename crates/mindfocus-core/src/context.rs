//! The application context: one owner for every state slice.
//!
//! `FocusContext` loads all slices from the store at startup, routes every
//! mutation through itself and flushes the touched slices back immediately,
//! so a process exit at any point loses at most the operation in flight.
//! Operations return typed [`Event`]s; frontends decide how to present them.

use chrono::{Local, NaiveDate, Utc};

use crate::achievements::{self, initial_achievements, Achievement, UserStats};
use crate::error::StorageError;
use crate::events::Event;
use crate::session::{SessionLog, SessionRecord};
use crate::storage::{keys, Config, Store};
use crate::stress::{SessionTag, StressAssessment, StressMonitor};
use crate::task::{Task, TaskCategory, TaskPatch, TaskRegistry};
use crate::timer::{TimerEngine, TimerMode, TimerSettings, TimerState};
use crate::ValidationError;

/// Bumped when a slice's persisted shape changes incompatibly. A mismatch on
/// load drops the slice and starts from defaults.
const SCHEMA_VERSION: u32 = 1;

pub struct FocusContext {
    store: Store,
    config: Config,
    engine: TimerEngine,
    tasks: TaskRegistry,
    sessions: SessionLog,
    stats: UserStats,
    achievements: Vec<Achievement>,
    stress: StressMonitor,
}

impl FocusContext {
    /// Load every slice from the store. Missing or corrupt slices fall back
    /// to defaults independently.
    pub fn load(store: Store, config: Config) -> Result<Self, StorageError> {
        let settings: TimerSettings = store
            .get_json(keys::TIMER_SETTINGS, SCHEMA_VERSION)?
            .unwrap_or_default();

        let mut engine: TimerEngine = store
            .get_json(keys::TIMER_ENGINE, SCHEMA_VERSION)?
            .unwrap_or_else(|| TimerEngine::new(settings.clone()));
        // The settings slice is authoritative over whatever the persisted
        // engine carried.
        engine.update_settings(settings);

        let tasks: Vec<Task> = store
            .get_json(keys::TASKS, SCHEMA_VERSION)?
            .unwrap_or_default();
        let selected: Option<String> = store
            .get_json(keys::SELECTED_TASK, SCHEMA_VERSION)?
            .unwrap_or_default();
        let tasks = TaskRegistry::from_parts(tasks, selected);

        let records: Vec<SessionRecord> = store
            .get_json(keys::SESSIONS, SCHEMA_VERSION)?
            .unwrap_or_default();
        let sessions = SessionLog::new(records);

        let mut stats: UserStats = store
            .get_json(keys::USER_STATS, SCHEMA_VERSION)?
            .unwrap_or_default();
        stats.daily_goal = config.goals.daily_goal;

        let achievements = match store.get_json::<Vec<Achievement>>(keys::ACHIEVEMENTS, SCHEMA_VERSION)? {
            Some(stored) => reconcile_achievements(stored),
            None => initial_achievements(),
        };

        Ok(Self {
            store,
            config,
            engine,
            tasks,
            sessions,
            stats,
            achievements,
            stress: StressMonitor::new(),
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    pub fn sessions(&self) -> &SessionLog {
        &self.sessions
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn stress(&self) -> &StressMonitor {
        &self.stress
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start_timer(&mut self) -> Result<Option<Event>, StorageError> {
        let event = self.engine.start();
        if event.is_some() {
            self.flush_engine()?;
        }
        Ok(event)
    }

    pub fn pause_timer(&mut self) -> Result<Option<Event>, StorageError> {
        let event = self.engine.pause();
        if event.is_some() {
            self.flush_engine()?;
        }
        Ok(event)
    }

    pub fn reset_timer(&mut self) -> Result<Event, StorageError> {
        let event = self.engine.reset();
        self.flush_engine()?;
        Ok(event)
    }

    pub fn switch_mode(&mut self, mode: TimerMode) -> Result<Event, StorageError> {
        let event = self.engine.switch_mode(mode);
        self.flush_engine()?;
        Ok(event)
    }

    /// Persist new timer settings and apply them to the engine. A running
    /// countdown is never adjusted mid-flight.
    pub fn update_settings(&mut self, settings: TimerSettings) -> Result<(), StorageError> {
        self.store
            .set_json(keys::TIMER_SETTINGS, SCHEMA_VERSION, &settings)?;
        self.engine.update_settings(settings);
        self.flush_engine()
    }

    /// Advance the timer by one second and run whatever the resulting
    /// events demand.
    ///
    /// A focus completion runs the full pipeline: count against the selected
    /// task, append the session record, recompute stats, evaluate
    /// achievements, then optionally auto-start the next break. A break
    /// completion optionally auto-starts the next focus session.
    pub fn tick(&mut self) -> Result<Vec<Event>, StorageError> {
        let mut events = Vec::new();
        let Some(completed) = self.engine.tick() else {
            // No transition; the countdown moved at most one second and is
            // cheap to flush every time.
            if self.engine.state() == TimerState::Running {
                self.flush_engine()?;
            }
            return Ok(events);
        };
        self.flush_engine()?;

        if let Event::TimerCompleted { mode, .. } = &completed {
            let mode = *mode;
            events.push(completed);
            match mode {
                TimerMode::Focus => self.on_focus_complete(&mut events)?,
                TimerMode::ShortBreak | TimerMode::LongBreak => {
                    if self.engine.settings().auto_start_focus {
                        events.push(self.engine.switch_mode(TimerMode::Focus));
                        if let Some(ev) = self.engine.start() {
                            events.push(ev);
                        }
                        self.flush_engine()?;
                    }
                }
            }
        } else {
            events.push(completed);
        }
        Ok(events)
    }

    fn on_focus_complete(&mut self, events: &mut Vec<Event>) -> Result<(), StorageError> {
        let today = Local::now().date_naive();

        if let Some(id) = self.tasks.selected_id().map(str::to_string) {
            match self.tasks.increment_completed(&id) {
                Ok(_) => self.flush_tasks()?,
                // Selection is validated on load and on select, so a miss
                // means the task vanished mid-call. Drop the stale selection
                // and record the session as untasked.
                Err(_) => {
                    self.tasks.clear_selection();
                    self.flush_selection()?;
                }
            }
        }

        let task = self.tasks.selected().cloned();
        let duration_min = self.engine.settings().focus_min;
        let record = self
            .sessions
            .record_completion(task.as_ref(), duration_min, today);
        events.push(Event::SessionRecorded {
            session_id: record.id.clone(),
            task_id: record.task_id.clone(),
            task_title: record.task_title.clone(),
            category: record.category,
            duration_min: record.duration_min,
            at: Utc::now(),
        });
        self.flush_sessions()?;

        self.recompute_stats(today);
        let level_before = self.stats.level;
        let newly = achievements::evaluate(
            &mut self.stats,
            &mut self.achievements,
            Some(Local::now()),
        );
        for unlocked in newly {
            events.push(Event::AchievementUnlocked {
                id: unlocked.id,
                title: unlocked.title,
                points: unlocked.points,
                at: Utc::now(),
            });
        }
        if self.stats.level > level_before {
            events.push(Event::LevelUp {
                level: self.stats.level,
                at: Utc::now(),
            });
        }
        self.flush_stats()?;
        self.flush_achievements()?;

        if self.engine.settings().auto_start_breaks {
            let interval = self.engine.settings().long_break_interval.max(1);
            let next = if self.engine.focus_count() % interval == 0 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            };
            events.push(self.engine.switch_mode(next));
            if let Some(ev) = self.engine.start() {
                events.push(ev);
            }
            self.flush_engine()?;
        }
        Ok(())
    }

    /// Derive the log-driven stats fields; points, level and experience are
    /// owned by the achievement evaluator and left alone.
    fn recompute_stats(&mut self, today: NaiveDate) {
        self.stats.total_sessions = self.sessions.total_sessions() as u32;
        self.stats.current_streak = self.sessions.current_streak(today);
        self.stats.longest_streak = self
            .sessions
            .longest_streak()
            .max(self.stats.current_streak);
        self.stats.daily_sessions = self.sessions.sessions_on(today) as u32;
        self.stats.daily_goal = self.config.goals.daily_goal;
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn create_task(
        &mut self,
        title: &str,
        category: TaskCategory,
        estimated_sessions: u32,
    ) -> Result<Task, TaskOpError> {
        let task = self.tasks.create(title, category, estimated_sessions)?;
        self.flush_tasks()?;
        Ok(task)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<Task, TaskOpError> {
        let task = self.tasks.update(id, patch)?;
        self.flush_tasks()?;
        Ok(task)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task, TaskOpError> {
        let task = self.tasks.delete(id)?;
        self.flush_tasks()?;
        self.flush_selection()?;
        Ok(task)
    }

    pub fn select_task(&mut self, id: &str) -> Result<(), TaskOpError> {
        self.tasks.select(id)?;
        self.flush_selection()?;
        Ok(())
    }

    pub fn clear_task_selection(&mut self) -> Result<(), StorageError> {
        self.tasks.clear_selection();
        self.flush_selection()
    }

    pub fn mark_task_done(&mut self, id: &str) -> Result<Task, TaskOpError> {
        let task = self.tasks.mark_done(id)?;
        self.flush_tasks()?;
        Ok(task)
    }

    // ── Stress ───────────────────────────────────────────────────────

    /// Feed one stress reading, tagged with the current timer state. Emits
    /// a `BreathingBreakSuggested` event the moment the suggestion flag is
    /// newly raised.
    pub fn observe_stress(&mut self, score: f64) -> (StressAssessment, Option<Event>) {
        let tag = if self.engine.state() == TimerState::Idle {
            SessionTag::Idle
        } else if self.engine.mode() == TimerMode::Focus {
            SessionTag::Focus
        } else {
            SessionTag::Break
        };
        let already = self.stress.breathing_suggested();
        let assessment = self.stress.observe(score, tag);
        let event = (!already && self.stress.breathing_suggested()).then(|| {
            Event::BreathingBreakSuggested {
                level: assessment.level,
                at: Utc::now(),
            }
        });
        (assessment, event)
    }

    pub fn dismiss_breathing(&mut self) {
        self.stress.dismiss_breathing();
    }

    // ── Flushing ─────────────────────────────────────────────────────

    fn flush_engine(&self) -> Result<(), StorageError> {
        self.store
            .set_json(keys::TIMER_ENGINE, SCHEMA_VERSION, &self.engine)
    }

    fn flush_tasks(&self) -> Result<(), StorageError> {
        self.store
            .set_json(keys::TASKS, SCHEMA_VERSION, &self.tasks.tasks())
    }

    fn flush_selection(&self) -> Result<(), StorageError> {
        self.store.set_json(
            keys::SELECTED_TASK,
            SCHEMA_VERSION,
            &self.tasks.selected_id(),
        )
    }

    fn flush_sessions(&self) -> Result<(), StorageError> {
        self.store
            .set_json(keys::SESSIONS, SCHEMA_VERSION, &self.sessions.records())
    }

    fn flush_stats(&self) -> Result<(), StorageError> {
        self.store
            .set_json(keys::USER_STATS, SCHEMA_VERSION, &self.stats)
    }

    fn flush_achievements(&self) -> Result<(), StorageError> {
        self.store
            .set_json(keys::ACHIEVEMENTS, SCHEMA_VERSION, &self.achievements)
    }
}

/// Keep stored unlock state while picking up catalog entries added since the
/// slice was written.
fn reconcile_achievements(stored: Vec<Achievement>) -> Vec<Achievement> {
    let mut merged = stored;
    for def in achievements::CATALOG {
        if !merged.iter().any(|a| a.id == def.id) {
            merged.push(Achievement::from(def));
        }
    }
    merged
}

/// A task operation can fail on validation or on the flush that follows.
#[derive(Debug, thiserror::Error)]
pub enum TaskOpError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> FocusContext {
        let store = Store::open_memory().unwrap();
        FocusContext::load(store, Config::default()).unwrap()
    }

    /// Drive the running countdown to completion, collecting all events.
    fn run_to_completion(ctx: &mut FocusContext) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..(ctx.engine().settings().focus_min * 60 + 60) {
            events.extend(ctx.tick().unwrap());
            if events
                .iter()
                .any(|e| matches!(e, Event::TimerCompleted { .. }))
            {
                break;
            }
        }
        events
    }

    #[test]
    fn focus_completion_runs_full_pipeline() {
        let mut ctx = context();
        let id = ctx.create_task("Study", TaskCategory::Study, 3).unwrap().id;
        ctx.select_task(&id).unwrap();

        ctx.start_timer().unwrap();
        let events = run_to_completion(&mut ctx);

        assert!(events.iter().any(|e| matches!(e, Event::TimerCompleted { .. })));
        assert!(events.iter().any(|e| matches!(e, Event::SessionRecorded { .. })));
        assert_eq!(ctx.tasks().get(&id).unwrap().completed_sessions, 1);
        assert_eq!(ctx.stats().total_sessions, 1);
        assert_eq!(ctx.stats().daily_sessions, 1);
        assert_eq!(ctx.stats().current_streak, 1);
        // first_streak unlocks on streak 1.
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::AchievementUnlocked { id, .. } if id == "first_streak")));
    }

    #[test]
    fn auto_start_switches_to_short_break() {
        let mut ctx = context();
        ctx.start_timer().unwrap();
        let events = run_to_completion(&mut ctx);

        assert!(events
            .iter()
            .any(|e| matches!(e, Event::ModeSwitched { mode: TimerMode::ShortBreak, .. })));
        assert_eq!(ctx.engine().mode(), TimerMode::ShortBreak);
        assert_eq!(ctx.engine().state(), TimerState::Running);
    }

    #[test]
    fn fourth_focus_earns_long_break() {
        let mut ctx = context();
        let mut settings = TimerSettings::default();
        settings.focus_min = 1;
        settings.short_break_min = 1;
        settings.long_break_min = 1;
        settings.auto_start_breaks = true;
        settings.auto_start_focus = true;
        ctx.update_settings(settings).unwrap();

        ctx.start_timer().unwrap();
        let mut long_break_seen = false;
        for _ in 0..(8 * 60 + 20) {
            for event in ctx.tick().unwrap() {
                if matches!(event, Event::ModeSwitched { mode: TimerMode::LongBreak, .. }) {
                    long_break_seen = true;
                }
            }
            if long_break_seen {
                break;
            }
        }
        assert!(long_break_seen);
        assert_eq!(ctx.engine().focus_count(), 4);
    }

    #[test]
    fn break_completion_records_nothing() {
        let mut ctx = context();
        let mut settings = TimerSettings::default();
        settings.short_break_min = 1;
        settings.auto_start_focus = false;
        ctx.update_settings(settings).unwrap();
        ctx.switch_mode(TimerMode::ShortBreak).unwrap();
        ctx.start_timer().unwrap();

        let mut events = Vec::new();
        for _ in 0..70 {
            events.extend(ctx.tick().unwrap());
        }
        assert!(events.iter().any(|e| matches!(e, Event::TimerCompleted { .. })));
        assert!(!events.iter().any(|e| matches!(e, Event::SessionRecorded { .. })));
        assert_eq!(ctx.stats().total_sessions, 0);
        assert_eq!(ctx.engine().state(), TimerState::Idle);
    }

    #[test]
    fn deleting_selected_task_mid_countdown_records_untasked() {
        let mut ctx = context();
        let id = ctx.create_task("Gone", TaskCategory::Work, 1).unwrap().id;
        ctx.select_task(&id).unwrap();
        ctx.start_timer().unwrap();
        ctx.tick().unwrap();

        ctx.delete_task(&id).unwrap();
        let events = run_to_completion(&mut ctx);

        let recorded = events
            .iter()
            .find(|e| matches!(e, Event::SessionRecorded { .. }))
            .unwrap();
        if let Event::SessionRecorded { task_id, .. } = recorded {
            assert!(task_id.is_none());
        }
        assert!(ctx.tasks().selected_id().is_none());
        assert_eq!(ctx.stats().total_sessions, 1);
    }

    #[test]
    fn completion_without_selection_records_untasked_session() {
        let mut ctx = context();
        ctx.start_timer().unwrap();
        let events = run_to_completion(&mut ctx);

        let recorded = events
            .iter()
            .find(|e| matches!(e, Event::SessionRecorded { .. }))
            .unwrap();
        if let Event::SessionRecorded { task_id, task_title, .. } = recorded {
            assert!(task_id.is_none());
            assert!(task_title.is_none());
        }
        assert_eq!(ctx.stats().total_sessions, 1);
    }

    #[test]
    fn state_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");

        let id = {
            let store = Store::open_at(&path).unwrap();
            let mut ctx = FocusContext::load(store, Config::default()).unwrap();
            let id = ctx.create_task("Persist", TaskCategory::Work, 2).unwrap().id;
            ctx.select_task(&id).unwrap();
            ctx.start_timer().unwrap();
            run_to_completion(&mut ctx);
            id
        };

        let store = Store::open_at(&path).unwrap();
        let ctx = FocusContext::load(store, Config::default()).unwrap();
        assert_eq!(ctx.tasks().get(&id).unwrap().completed_sessions, 1);
        assert_eq!(ctx.tasks().selected_id(), Some(id.as_str()));
        assert_eq!(ctx.stats().total_sessions, 1);
        assert!(ctx
            .achievements()
            .iter()
            .any(|a| a.id == "first_streak" && a.unlocked));
        // auto_start_breaks moved the persisted engine into the break.
        assert_eq!(ctx.engine().mode(), TimerMode::ShortBreak);
    }

    #[test]
    fn settings_slice_overrides_persisted_engine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");

        {
            let store = Store::open_at(&path).unwrap();
            let mut ctx = FocusContext::load(store, Config::default()).unwrap();
            let mut settings = TimerSettings::default();
            settings.focus_min = 50;
            ctx.update_settings(settings).unwrap();
        }

        let store = Store::open_at(&path).unwrap();
        let ctx = FocusContext::load(store, Config::default()).unwrap();
        assert_eq!(ctx.engine().settings().focus_min, 50);
        assert_eq!(ctx.engine().remaining_secs(), 50 * 60);
    }

    #[test]
    fn observe_stress_emits_breathing_event_once() {
        let mut ctx = context();
        ctx.start_timer().unwrap();

        let mut emitted = 0;
        for _ in 0..6 {
            let (_, event) = ctx.observe_stress(90.0);
            if event.is_some() {
                emitted += 1;
            }
        }
        assert_eq!(emitted, 1);
        assert!(ctx.stress().breathing_suggested());

        ctx.dismiss_breathing();
        assert!(!ctx.stress().breathing_suggested());
    }

    #[test]
    fn idle_readings_never_suggest_breathing() {
        let mut ctx = context();
        for _ in 0..6 {
            let (_, event) = ctx.observe_stress(95.0);
            assert!(event.is_none());
        }
        assert!(!ctx.stress().breathing_suggested());
    }
}
