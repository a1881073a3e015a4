//! Task-related entity definitions and lifecycle rules.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length.
pub const TITLE_MAX_LEN: usize = 200;

/// How long after creation a task title may still be edited.
pub fn title_edit_window() -> Duration {
    Duration::minutes(5)
}

/// Status of a task.
///
/// Progression is one-way out of `New`: once a task has left `New` it can
/// never be set back. Any other transition among the three states is
/// allowed, including no-op self-transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Just created, not started.
    #[serde(rename = "NEW")]
    New,
    /// Work has started.
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    /// Work is finished.
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::New
    }
}

impl TaskStatus {
    /// Converts the status to its wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    /// Parses a status from its wire/storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(Self::New),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the store.
    pub id: i64,
    /// Owning user. Always the authenticated creator, never client-supplied.
    pub user_id: i64,
    /// Title, unique per owner.
    pub title: String,
    /// Free-text description, empty when absent.
    pub description: String,
    /// Current status.
    pub status: TaskStatus,
    /// When this record was created. Immutable.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// The instant after which the title becomes immutable.
    pub fn title_edit_deadline(&self) -> DateTime<Utc> {
        self.created_at + title_edit_window()
    }

    /// Returns true while the title may still be edited.
    pub fn can_edit_title(&self) -> bool {
        Utc::now() < self.title_edit_deadline()
    }

    /// Returns true if the status may change to `next`.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        // Only regressions into New are forbidden.
        next != TaskStatus::New || self.status == TaskStatus::New
    }
}

/// A task record ready for insertion; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl NewTask {
    /// Creates a new task record with default status.
    pub fn new(user_id: i64, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            description: String::new(),
            status: TaskStatus::New,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_created_at(created_at: DateTime<Utc>) -> Task {
        Task {
            id: 1,
            user_id: 1,
            title: "Water the plants".to_string(),
            description: String::new(),
            status: TaskStatus::New,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [TaskStatus::New, TaskStatus::InProgress, TaskStatus::Completed] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("DONE"), None);
    }

    #[test]
    fn test_title_editable_within_window() {
        let task = task_created_at(Utc::now() - Duration::seconds(4 * 60 + 59));
        assert!(task.can_edit_title());
    }

    #[test]
    fn test_title_frozen_after_window() {
        let task = task_created_at(Utc::now() - Duration::seconds(5 * 60 + 1));
        assert!(!task.can_edit_title());
    }

    #[test]
    fn test_forward_transitions_allowed() {
        let mut task = task_created_at(Utc::now());
        assert!(task.can_transition_to(TaskStatus::InProgress));
        assert!(task.can_transition_to(TaskStatus::Completed));
        assert!(task.can_transition_to(TaskStatus::New));

        task.status = TaskStatus::InProgress;
        assert!(task.can_transition_to(TaskStatus::InProgress));
        assert!(task.can_transition_to(TaskStatus::Completed));

        task.status = TaskStatus::Completed;
        assert!(task.can_transition_to(TaskStatus::Completed));
        assert!(task.can_transition_to(TaskStatus::InProgress));
    }

    #[test]
    fn test_no_regression_into_new() {
        let mut task = task_created_at(Utc::now());
        task.status = TaskStatus::InProgress;
        assert!(!task.can_transition_to(TaskStatus::New));

        task.status = TaskStatus::Completed;
        assert!(!task.can_transition_to(TaskStatus::New));
    }
}
