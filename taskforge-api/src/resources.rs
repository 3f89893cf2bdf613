/// Response representations of domain models
///
/// Resources are the JSON shapes handed to clients. They flatten domain
/// types into strings: enums become wire value plus display label, dates
/// become formatted strings, and derived flags (`is_completed`,
/// `is_overdue`) are computed at serialization time so clients never
/// re-derive them.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;

use taskforge_shared::models::task::Task;
use taskforge_shared::models::user::User;

/// Task as clients see it
///
/// # Example
///
/// ```json
/// {
///   "id": "7d9f...",
///   "title": "Ship the release",
///   "description": null,
///   "status": "in_progress",
///   "status_label": "In Progress",
///   "priority": "high",
///   "priority_label": "High",
///   "due_date": "2026-02-01",
///   "due_date_formatted": "Feb 01, 2026",
///   "is_completed": false,
///   "is_overdue": false,
///   "created_at": "2026-01-05T12:34:56+00:00",
///   "updated_at": "2026-01-05T12:34:56+00:00"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TaskResource {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: &'static str,
    pub status_label: &'static str,
    pub priority: &'static str,
    pub priority_label: &'static str,
    pub due_date: Option<String>,
    pub due_date_formatted: Option<String>,
    pub is_completed: bool,
    pub is_overdue: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskResource {
    /// Builds the resource, deriving the overdue flag against `today`
    pub fn from_task(task: &Task, today: NaiveDate) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.as_str(),
            status_label: task.status.label(),
            priority: task.priority.as_str(),
            priority_label: task.priority.label(),
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            due_date_formatted: task.due_date.map(|d| d.format("%b %d, %Y").to_string()),
            is_completed: task.is_completed(),
            is_overdue: task.is_overdue_on(today),
            created_at: format_timestamp(task.created_at),
            updated_at: format_timestamp(task.updated_at),
        }
    }
}

/// User as clients see it
///
/// Never exposes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResource {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<String>,
    pub created_at: String,
}

impl UserResource {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            email_verified_at: user.email_verified_at.map(format_timestamp),
            created_at: format_timestamp(user.created_at),
        }
    }
}

/// ISO 8601 with second precision and an explicit offset
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}
