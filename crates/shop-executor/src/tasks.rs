//! Status tracking for the independent units of a page load.

use std::collections::HashMap;

/// Status of a tracked task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Registered, not started.
    Pending,
    /// Started and not yet finished.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed(String),
}

impl TaskStatus {
    /// Whether the task has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }
}

/// Tracks named tasks that run independently of each other.
///
/// Tasks never depend on one another; the tracker only records what
/// happened to each so the caller can summarize a load.
#[derive(Debug, Default)]
pub struct TaskTracker {
    tasks: HashMap<String, TaskStatus>,
    /// Order tasks were registered.
    order: Vec<String>,
}

impl TaskTracker {
    /// Create a new tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task in `Pending` state. Registering twice is a no-op.
    pub fn add_task(&mut self, name: &str) {
        if self.tasks.contains_key(name) {
            return;
        }
        self.tasks.insert(name.to_string(), TaskStatus::Pending);
        self.order.push(name.to_string());
    }

    /// Mark a task as running.
    pub fn start(&mut self, name: &str) {
        if let Some(s) = self.tasks.get_mut(name) {
            *s = TaskStatus::Running;
        }
    }

    /// Mark a task as completed.
    pub fn complete(&mut self, name: &str) {
        if let Some(s) = self.tasks.get_mut(name) {
            *s = TaskStatus::Completed;
        }
    }

    /// Mark a task as failed.
    pub fn fail(&mut self, name: &str, error: impl Into<String>) {
        if let Some(s) = self.tasks.get_mut(name) {
            *s = TaskStatus::Failed(error.into());
        }
    }

    /// Get task status by name.
    pub fn status(&self, name: &str) -> Option<&TaskStatus> {
        self.tasks.get(name)
    }

    /// Whether every registered task has finished.
    pub fn is_complete(&self) -> bool {
        self.tasks.values().all(TaskStatus::is_finished)
    }

    /// Names of failed tasks, in registration order.
    pub fn failed(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|n| matches!(self.tasks.get(*n), Some(TaskStatus::Failed(_))))
            .map(String::as_str)
            .collect()
    }

    /// All tasks with their status, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskStatus)> {
        self.order
            .iter()
            .filter_map(|n| self.tasks.get(n).map(|s| (n.as_str(), s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut tracker = TaskTracker::new();
        tracker.add_task("banner");
        tracker.add_task("products");
        tracker.add_task("banner");

        assert_eq!(tracker.status("banner"), Some(&TaskStatus::Pending));
        assert!(!tracker.is_complete());

        tracker.start("banner");
        assert_eq!(tracker.status("banner"), Some(&TaskStatus::Running));
        tracker.complete("banner");
        tracker.start("products");
        tracker.fail("products", "HTTP error: 500");

        assert!(tracker.is_complete());
        assert_eq!(tracker.failed(), vec!["products"]);
        let names: Vec<&str> = tracker.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["banner", "products"]);
    }

    #[test]
    fn test_unknown_task_ignored() {
        let mut tracker = TaskTracker::new();
        tracker.complete("ghost");
        assert_eq!(tracker.status("ghost"), None);
        assert!(tracker.is_complete());
    }
}
