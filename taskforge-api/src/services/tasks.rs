/// Task business logic
///
/// [`TaskService`] owns every rule that is not plain storage: ownership
/// checks, creation defaults, the status toggle, delete confirmation, and
/// the audit trail. Handlers stay thin; the service talks to storage only
/// through the [`TaskRepository`] port, so all of this logic is tested
/// against an in-memory store.
///
/// # Ownership
///
/// Every operation takes the acting user's id and checks it against the
/// task before doing anything. A task that exists but belongs to someone
/// else is [`TaskError::Forbidden`]; a task that does not exist (or is
/// soft-deleted) is [`TaskError::NotFound`]. Lookups never take the owner
/// from request data.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use taskforge_shared::models::task::{NewTask, Task, TaskChanges, TaskPriority, TaskStatus};
use taskforge_shared::query::filter::TaskFilter;
use taskforge_shared::query::page::{Page, PageRequest};
use taskforge_shared::repo::{RepoError, TaskRepository};

use super::audit::{AuditEvent, AuditLog};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// No live task with the requested id
    #[error("Task not found")]
    NotFound,

    /// The task exists but belongs to another user
    #[error("You do not have access to this task")]
    Forbidden,

    /// Storage failure
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Validated input for creating a task
///
/// Status and priority are optional here; the service applies the
/// pending/medium defaults so they live in exactly one place.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
}

/// Aggregated counts over a user's live tasks
///
/// `overdue` uses the per-task flag, so cancelled tasks with a past due
/// date are counted. `completion_rate` is a percentage rounded to two
/// decimals, 0 when there are no tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStatistics {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub overdue: i64,
    pub completion_rate: f64,
}

impl TaskStatistics {
    /// Computes the summary for a set of tasks
    pub fn summarize(tasks: &[Task], today: NaiveDate) -> Self {
        let count = |status: TaskStatus| -> i64 {
            tasks.iter().filter(|t| t.status == status).count() as i64
        };

        let total = tasks.len() as i64;
        let completed = count(TaskStatus::Completed);

        let completion_rate = if total > 0 {
            round2(completed as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        Self {
            total,
            pending: count(TaskStatus::Pending),
            in_progress: count(TaskStatus::InProgress),
            completed,
            cancelled: count(TaskStatus::Cancelled),
            overdue: tasks.iter().filter(|t| t.is_overdue_on(today)).count() as i64,
            completion_rate,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Task operations for authenticated users
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    audit: Arc<dyn AuditLog>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>, audit: Arc<dyn AuditLog>) -> Self {
        Self { repo, audit }
    }

    /// Lists one page of the user's tasks
    pub async fn list_tasks(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> Result<Page<Task>, TaskError> {
        Ok(self.repo.paginate_for_user(user_id, filter, page).await?)
    }

    /// Fetches one task, enforcing ownership
    pub async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Task, TaskError> {
        let task = self
            .repo
            .find_by_id(task_id)
            .await?
            .ok_or(TaskError::NotFound)?;

        if !task.belongs_to(user_id) {
            return Err(TaskError::Forbidden);
        }

        Ok(task)
    }

    /// Creates a task owned by the acting user
    pub async fn create_task(&self, user_id: Uuid, draft: TaskDraft) -> Result<Task, TaskError> {
        let task = self
            .repo
            .create(NewTask {
                user_id,
                title: draft.title,
                description: draft.description,
                status: draft.status.unwrap_or(TaskStatus::Pending),
                priority: draft.priority.unwrap_or(TaskPriority::Medium),
                due_date: draft.due_date,
            })
            .await?;

        self.audit.record(AuditEvent::TaskCreated {
            task_id: task.id,
            user_id,
            title: task.title.clone(),
        });

        Ok(task)
    }

    /// Applies a partial update to the user's task
    ///
    /// An empty change set skips the write and returns the task as-is,
    /// but still leaves an audit record: the client asked for an update
    /// and got one, even if nothing differed.
    pub async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> Result<Task, TaskError> {
        let existing = self.get_task(user_id, task_id).await?;

        let task = if changes.is_empty() {
            existing
        } else {
            self.repo
                .update(task_id, changes)
                .await?
                .ok_or(TaskError::NotFound)?
        };

        self.audit
            .record(AuditEvent::TaskUpdated { task_id, user_id });

        Ok(task)
    }

    /// Soft-deletes the user's task
    ///
    /// The audit record is only written when a live row was actually
    /// marked, so a concurrent delete does not produce a second entry.
    pub async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<(), TaskError> {
        self.get_task(user_id, task_id).await?;

        let deleted = self.repo.soft_delete(task_id).await?;
        if deleted {
            self.audit
                .record(AuditEvent::TaskDeleted { task_id, user_id });
        }

        Ok(())
    }

    /// Flips the task between completed and pending
    ///
    /// Completed toggles back to pending; every other status (including
    /// cancelled) toggles to completed.
    pub async fn toggle_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Task, TaskError> {
        let existing = self.get_task(user_id, task_id).await?;
        let previous_status = existing.status;

        let task = self
            .repo
            .set_status(task_id, previous_status.toggled())
            .await?
            .ok_or(TaskError::NotFound)?;

        self.audit.record(AuditEvent::TaskStatusToggled {
            task_id,
            user_id,
            previous_status,
            new_status: task.status,
        });

        Ok(task)
    }

    /// Summarizes the user's live tasks
    pub async fn statistics(&self, user_id: Uuid) -> Result<TaskStatistics, TaskError> {
        let tasks = self
            .repo
            .list_for_user(user_id, &TaskFilter::default())
            .await?;

        Ok(TaskStatistics::summarize(&tasks, Utc::now().date_naive()))
    }
}
