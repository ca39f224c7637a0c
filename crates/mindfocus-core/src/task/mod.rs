//! Task registry: user-defined tasks with an active selection.
//!
//! The registry is a plain in-memory collection; the owning
//! [`crate::FocusContext`] loads it from the store at startup and flushes it
//! after every mutation. Deleting a task never touches historical session
//! records - they keep their title/category snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskCategory {
    Work,
    Study,
    Personal,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Work => "Work",
            TaskCategory::Study => "Study",
            TaskCategory::Personal => "Personal",
        }
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "work" => Ok(TaskCategory::Work),
            "study" => Ok(TaskCategory::Study),
            "personal" => Ok(TaskCategory::Personal),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub category: TaskCategory,
    /// How many focus sessions the user expects this task to take.
    pub estimated_sessions: u32,
    /// Completed focus sessions. Monotonically increasing; may exceed the
    /// estimate.
    pub completed_sessions: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Partial update for [`TaskRegistry::update`]. `None` fields are left
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub category: Option<TaskCategory>,
    pub estimated_sessions: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
    selected: Option<String>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(tasks: Vec<Task>, selected: Option<String>) -> Self {
        let mut registry = Self { tasks, selected };
        // A selection pointing at a task that no longer exists is dropped.
        if let Some(id) = registry.selected.clone() {
            if registry.get(&id).is_none() {
                registry.selected = None;
            }
        }
        registry
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Create a task. The title must be non-empty after trimming and the
    /// estimate positive.
    pub fn create(
        &mut self,
        title: &str,
        category: TaskCategory,
        estimated_sessions: u32,
    ) -> Result<Task, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if estimated_sessions == 0 {
            return Err(ValidationError::InvalidValue {
                field: "estimated_sessions",
                message: "must be at least 1".into(),
            });
        }
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            category,
            estimated_sessions,
            completed_sessions: 0,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Apply a partial update. An explicit empty title is rejected.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Task, ValidationError> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyField("title"));
            }
        }
        if patch.estimated_sessions == Some(0) {
            return Err(ValidationError::InvalidValue {
                field: "estimated_sessions",
                message: "must be at least 1".into(),
            });
        }
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::NotFound {
                entity: "task",
                id: id.to_string(),
            })?;
        if let Some(title) = patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(estimate) = patch.estimated_sessions {
            task.estimated_sessions = estimate;
        }
        Ok(task.clone())
    }

    /// Remove a task, clearing the active selection if it pointed at it.
    /// Historical session records are unaffected.
    pub fn delete(&mut self, id: &str) -> Result<Task, ValidationError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ValidationError::NotFound {
                entity: "task",
                id: id.to_string(),
            })?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Ok(self.tasks.remove(index))
    }

    pub fn select(&mut self, id: &str) -> Result<(), ValidationError> {
        if self.get(id).is_none() {
            return Err(ValidationError::NotFound {
                entity: "task",
                id: id.to_string(),
            });
        }
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Count one completed focus session against a task.
    ///
    /// Invoked by the completion pipeline for the active selection. There is
    /// no dedup key - the caller must guarantee at-most-once delivery per
    /// completed session.
    pub fn increment_completed(&mut self, id: &str) -> Result<u32, ValidationError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::NotFound {
                entity: "task",
                id: id.to_string(),
            })?;
        task.completed_sessions += 1;
        Ok(task.completed_sessions)
    }

    /// Mark a task done. The timestamp is set once and kept on repeat calls.
    pub fn mark_done(&mut self, id: &str) -> Result<Task, ValidationError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::NotFound {
                entity: "task",
                id: id.to_string(),
            })?;
        if task.completed_at.is_none() {
            task.completed_at = Some(Utc::now());
        }
        Ok(task.clone())
    }
}
