use crate::error::AppError;
use crate::model::Task;

/// Ordered in-memory task collection for one invocation.
///
/// Tasks are kept in ascending-id order (equivalently insertion order, since
/// ids are monotonic and deletions do not renumber survivors). Invariants:
/// all ids distinct; `completed_at` is set exactly while `done` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    tasks: Vec<Task>,
}

impl Store {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Builds a store from decoded tasks, rejecting data that violates the
    /// store invariants.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, AppError> {
        for (index, task) in tasks.iter().enumerate() {
            if tasks[..index].iter().any(|other| other.id == task.id) {
                return Err(AppError::invalid_data(format!(
                    "duplicate task id {}",
                    task.id
                )));
            }
            if index > 0 && task.id < tasks[index - 1].id {
                return Err(AppError::invalid_data(format!(
                    "task ids out of order: {} after {}",
                    task.id,
                    tasks[index - 1].id
                )));
            }
            if task.done && task.completed_at.is_none() {
                return Err(AppError::invalid_data(format!(
                    "task {} is done but has no completed_at",
                    task.id
                )));
            }
            if !task.done && task.completed_at.is_some() {
                return Err(AppError::invalid_data(format!(
                    "task {} is not done but has a completed_at",
                    task.id
                )));
            }
        }

        Ok(Self { tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    fn next_id(&self) -> u64 {
        self.tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1
    }

    /// Appends a new pending task with the next id and returns a copy of it.
    pub fn add(&mut self, message: &str, now: &str) -> Result<Task, AppError> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("message is required"));
        }

        let task = Task {
            id: self.next_id(),
            message: trimmed.to_string(),
            created_at: now.to_string(),
            completed_at: None,
            done: false,
        };
        self.tasks.push(task.clone());

        Ok(task)
    }

    /// Flips `done` on the task with the given id. Completing a task stamps
    /// `completed_at`; reopening it clears the stamp so a not-done task never
    /// carries a stale completion time.
    pub fn toggle(&mut self, id: u64, now: &str) -> Result<Task, AppError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::not_found(format!("no task with id {id}")))?;

        if task.done {
            task.done = false;
            task.completed_at = None;
        } else {
            task.done = true;
            task.completed_at = Some(now.to_string());
        }

        Ok(task.clone())
    }

    /// Removes the task with the given id, preserving the relative order of
    /// the remainder, and returns it.
    pub fn delete(&mut self, id: u64) -> Result<Task, AppError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| AppError::not_found(format!("no task with id {id}")))?;

        Ok(self.tasks.remove(index))
    }
}
