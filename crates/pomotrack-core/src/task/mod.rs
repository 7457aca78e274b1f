//! Task list with per-task pomodoro accounting.
//!
//! The list owns its tasks. The timer engine only holds a [`TaskId`] for the
//! active task and looks it up here when a focus countdown completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use uuid::Uuid;

/// Opaque, unique task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, enough to tell tasks apart on screen.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Always at least 1.
    pub estimated_pomodoros: u32,
    pub actual_pomodoros: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>, estimated_pomodoros: u32) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            estimated_pomodoros: estimated_pomodoros.max(1),
            actual_pomodoros: 0,
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Pomodoros still expected before the estimate is met.
    pub fn remaining_estimate(&self) -> u32 {
        self.estimated_pomodoros.saturating_sub(self.actual_pomodoros)
    }
}

/// Ordered list of tasks, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Append a task and return a reference to it.
    pub fn push(&mut self, task: Task) -> &Task {
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    /// Flip the completed flag. Returns the new value, or `None` for unknown ids.
    pub fn toggle_completion(&mut self, id: &TaskId) -> Option<bool> {
        let task = self.get_mut(id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Add one finished pomodoro to a task. Returns the new count.
    pub fn credit_pomodoro(&mut self, id: &TaskId) -> Option<u32> {
        let task = self.get_mut(id)?;
        task.actual_pomodoros = task.actual_pomodoros.saturating_add(1);
        Some(task.actual_pomodoros)
    }

    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| &t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    /// Resolve a user reference to a task id.
    ///
    /// Accepts a 1-based position in the list or an unambiguous id prefix.
    pub fn resolve(&self, reference: &str) -> Option<TaskId> {
        let reference = reference.trim().trim_start_matches('#');
        if reference.is_empty() {
            return None;
        }
        if let Ok(index) = reference.parse::<usize>() {
            if let Some(task) = index.checked_sub(1).and_then(|i| self.tasks.get(i)) {
                return Some(task.id.clone());
            }
        }
        let mut matches = self
            .tasks
            .iter()
            .filter(|t| t.id.as_str().starts_with(reference));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Some(task.id.clone()),
            _ => None,
        }
    }

    fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }
}

impl Deref for TaskList {
    type Target = [Task];

    fn deref(&self) -> &[Task] {
        &self.tasks
    }
}
