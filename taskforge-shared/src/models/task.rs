/// Task model and domain rules
///
/// Tasks are the core entity: every task belongs to exactly one user and
/// carries a workflow status, a priority, and an optional due date. All
/// persistence goes through the repository port in `crate::repo`; this
/// module holds the data shapes and the pure rules (toggle transition,
/// overdue derivation, ownership equality).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed', 'cancelled');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high', 'urgent');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
///
/// Soft deletes: `deleted_at` is set instead of removing the row, and every
/// live-row query filters on `deleted_at IS NULL`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow status of a task
///
/// The derived `Ord` follows declaration order, which matches the Postgres
/// enum declaration, so in-memory and SQL sorts agree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Returns the wire form of the status, e.g. "in_progress"
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Returns the human-readable label, e.g. "In Progress"
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
        }
    }

    /// Parses a status from its wire form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            "cancelled" => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }

    /// The status toggle transition: completed flips back to pending, every
    /// other status moves to completed
    pub fn toggled(self) -> Self {
        if self == TaskStatus::Completed {
            TaskStatus::Pending
        } else {
            TaskStatus::Completed
        }
    }
}

/// Priority of a task
///
/// Ordering is by severity (urgent highest), which also matches the
/// Postgres enum declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Returns the wire form of the priority, e.g. "urgent"
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }

    /// Returns the human-readable label, e.g. "Urgent"
    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
            TaskPriority::Urgent => "Urgent",
        }
    }

    /// Parses a priority from its wire form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            "urgent" => Some(TaskPriority::Urgent),
            _ => None,
        }
    }

    /// Numeric severity rank, urgent highest
    ///
    /// Sorting by priority uses this rank, never the lexical name (lexical
    /// descending would give urgent, medium, low, high).
    pub fn severity(&self) -> u8 {
        match self {
            TaskPriority::Low => 1,
            TaskPriority::Medium => 2,
            TaskPriority::High => 3,
            TaskPriority::Urgent => 4,
        }
    }
}

/// Task model representing one to-do item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Owning user; immutable after creation and the sole basis for access
    /// control
    pub user_id: Uuid,

    /// Title (required, at most 255 characters)
    pub title: String,

    /// Optional free-form description (at most 5000 characters)
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date (calendar date, no time component)
    pub due_date: Option<NaiveDate>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker; a set value excludes the row from normal queries
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    /// True when the task is owned by the given user
    pub fn belongs_to(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// True when the task has reached the completed status
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Derived overdue flag, anchored to an explicit date so callers and
    /// tests share one clock
    ///
    /// A task is overdue when it has a due date strictly before `today` and
    /// is not completed. Only completion exempts: a cancelled task with a
    /// past due date still counts as overdue here. The list-level overdue
    /// filter in `crate::query::filter` additionally excludes cancelled
    /// tasks; the two predicates are intentionally different.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due_date) => !self.is_completed() && due_date < today,
            None => false,
        }
    }

    /// Derived overdue flag against the current date
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Utc::now().date_naive())
    }
}

/// Input for creating a new task
///
/// `user_id` is always the authenticated caller, never client-supplied.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

/// Input for partially updating a task
///
/// The outer `None` leaves a column untouched. For the nullable columns the
/// inner `Option` distinguishes "set a value" from "clear" (`Some(None)`).
/// Status and priority can only be replaced, never cleared.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskChanges {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with(status: TaskStatus, due_date: Option<NaiveDate>) -> Task {
        Task {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Write report".to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_status_wire_forms_round_trip() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("archived"), None);
        assert_eq!(TaskStatus::parse(""), None);
        assert_eq!(TaskStatus::parse("Pending"), None);
    }

    #[test]
    fn test_priority_wire_forms_round_trip() {
        for priority in [
            TaskPriority::Low,
            TaskPriority::Medium,
            TaskPriority::High,
            TaskPriority::Urgent,
        ] {
            assert_eq!(TaskPriority::parse(priority.as_str()), Some(priority));
        }
        assert_eq!(TaskPriority::parse("critical"), None);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(TaskStatus::Pending.label(), "Pending");
        assert_eq!(TaskStatus::InProgress.label(), "In Progress");
        assert_eq!(TaskStatus::Completed.label(), "Completed");
        assert_eq!(TaskStatus::Cancelled.label(), "Cancelled");
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(TaskPriority::Low.label(), "Low");
        assert_eq!(TaskPriority::Medium.label(), "Medium");
        assert_eq!(TaskPriority::High.label(), "High");
        assert_eq!(TaskPriority::Urgent.label(), "Urgent");
    }

    #[test]
    fn test_toggle_flips_completed_to_pending() {
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
    }

    #[test]
    fn test_toggle_moves_every_other_status_to_completed() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Cancelled.toggled(), TaskStatus::Completed);
    }

    #[test]
    fn test_toggle_twice_from_pending_is_identity() {
        assert_eq!(TaskStatus::Pending.toggled().toggled(), TaskStatus::Pending);
    }

    #[test]
    fn test_priority_severity_order() {
        assert!(TaskPriority::Urgent.severity() > TaskPriority::High.severity());
        assert!(TaskPriority::High.severity() > TaskPriority::Medium.severity());
        assert!(TaskPriority::Medium.severity() > TaskPriority::Low.severity());
    }

    #[test]
    fn test_derived_ord_matches_severity() {
        assert!(TaskPriority::Urgent > TaskPriority::High);
        assert!(TaskPriority::High > TaskPriority::Medium);
        assert!(TaskPriority::Medium > TaskPriority::Low);
    }

    #[test]
    fn test_overdue_requires_a_due_date() {
        let task = task_with(TaskStatus::Pending, None);
        assert!(!task.is_overdue_on(date(2026, 1, 10)));
    }

    #[test]
    fn test_overdue_when_past_due_and_open() {
        let task = task_with(TaskStatus::Pending, Some(date(2026, 1, 5)));
        assert!(task.is_overdue_on(date(2026, 1, 10)));
    }

    #[test]
    fn test_not_overdue_on_the_due_date_itself() {
        let task = task_with(TaskStatus::Pending, Some(date(2026, 1, 10)));
        assert!(!task.is_overdue_on(date(2026, 1, 10)));
    }

    #[test]
    fn test_not_overdue_when_due_in_the_future() {
        let task = task_with(TaskStatus::Pending, Some(date(2026, 1, 15)));
        assert!(!task.is_overdue_on(date(2026, 1, 10)));
    }

    #[test]
    fn test_completed_task_is_never_overdue() {
        let task = task_with(TaskStatus::Completed, Some(date(2026, 1, 5)));
        assert!(!task.is_overdue_on(date(2026, 1, 10)));
    }

    #[test]
    fn test_cancelled_task_past_due_is_still_overdue() {
        // Only completion exempts the per-record flag; cancellation does not
        let task = task_with(TaskStatus::Cancelled, Some(date(2026, 1, 5)));
        assert!(task.is_overdue_on(date(2026, 1, 10)));
    }

    #[test]
    fn test_belongs_to() {
        let task = task_with(TaskStatus::Pending, None);
        assert!(task.belongs_to(task.user_id));
        assert!(!task.belongs_to(Uuid::new_v4()));
    }

    #[test]
    fn test_task_changes_is_empty() {
        assert!(TaskChanges::default().is_empty());

        let changes = TaskChanges {
            priority: Some(TaskPriority::High),
            ..Default::default()
        };
        assert!(!changes.is_empty());

        let clears_description = TaskChanges {
            description: Some(None),
            ..Default::default()
        };
        assert!(!clears_description.is_empty());
    }
}
