//! Session task list.
//!
//! Tasks are keyed by a counter that only moves forward, so a deleted task's
//! key is never handed out again and the reward guard can keep every key it
//! has seen without eviction.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::progression::{Grant, ProgressionLedger, RewardGuard};

/// Upper bound on list length.
pub const MAX_TASKS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskKey(pub u64);

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub key: TaskKey,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of checking or unchecking a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggled {
    pub done: bool,
    /// Set only the first time this task is checked done.
    pub reward: Option<Grant>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_key: u64,
    #[serde(default)]
    guard: RewardGuard,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn get(&self, key: TaskKey) -> Option<&Task> {
        self.tasks.iter().find(|t| t.key == key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tasks.len() >= MAX_TASKS
    }

    pub fn guard(&self) -> &RewardGuard {
        &self.guard
    }

    /// # Errors
    /// [`TaskError::EmptyTitle`] for a blank title, [`TaskError::LimitReached`]
    /// when the list already holds [`MAX_TASKS`].
    pub fn add(&mut self, title: &str) -> Result<TaskKey, TaskError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        if self.is_full() {
            return Err(TaskError::LimitReached { max: MAX_TASKS });
        }
        let key = TaskKey(self.next_key);
        self.next_key += 1;
        self.tasks.push(Task {
            key,
            title: title.to_string(),
            done: false,
            created_at: Utc::now(),
        });
        Ok(key)
    }

    /// # Errors
    /// [`TaskError::EmptyTitle`] or [`TaskError::NotFound`].
    pub fn edit(&mut self, key: TaskKey, title: &str) -> Result<(), TaskError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        let task = self.get_mut(key)?;
        task.title = title.to_string();
        Ok(())
    }

    /// Flip the done flag. Checking a task done pays out through the guard,
    /// so re-checking the same task never pays twice.
    ///
    /// # Errors
    /// [`TaskError::NotFound`] if no task has this key.
    pub fn toggle(&mut self, key: TaskKey, ledger: &mut ProgressionLedger) -> Result<Toggled, TaskError> {
        let task = self.get_mut(key)?;
        task.done = !task.done;
        let done = task.done;
        let reward = if done {
            self.guard.try_reward(key, ledger).grant()
        } else {
            None
        };
        Ok(Toggled { done, reward })
    }

    /// # Errors
    /// [`TaskError::NotFound`] if no task has this key.
    pub fn remove(&mut self, key: TaskKey) -> Result<Task, TaskError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.key == key)
            .ok_or(TaskError::NotFound(key))?;
        Ok(self.tasks.remove(idx))
    }

    fn get_mut(&mut self, key: TaskKey) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|t| t.key == key)
            .ok_or(TaskError::NotFound(key))
    }
}
