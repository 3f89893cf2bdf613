/// Task endpoints
///
/// The full CRUD surface plus the status toggle:
///
/// - `GET /v1/tasks` - Filtered, sorted, paginated list
/// - `POST /v1/tasks` - Create
/// - `GET /v1/tasks/:id` - Fetch one
/// - `PUT/PATCH /v1/tasks/:id` - Partial update
/// - `DELETE /v1/tasks/:id` - Soft delete
/// - `PATCH /v1/tasks/:id/toggle` - Flip completed/pending
///
/// Every handler runs behind bearer auth and scopes to the token's user.
///
/// # Request parsing
///
/// Query parameters and body fields arrive as raw strings and are parsed
/// here, so a bad value becomes a 422 with a field-keyed message in the
/// standard envelope rather than an extractor rejection. Parsing collects
/// every failed field before answering, and strings are trimmed first
/// with empty values treated as absent.
///
/// Update bodies distinguish an absent field (leave alone) from an
/// explicit `null`. For `description` and `due_date` null clears the
/// value; for `title`, `status`, and `priority` it is a validation error.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, FieldErrors},
    resources::TaskResource,
    response::{message_only, Envelope, ListEnvelope},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use taskforge_shared::auth::middleware::CurrentUser;
use taskforge_shared::models::task::{TaskChanges, TaskPriority, TaskStatus};
use taskforge_shared::query::filter::{SortField, SortOrder, TaskFilter};
use taskforge_shared::query::page::{PageRequest, DEFAULT_PER_PAGE};
use uuid::Uuid;

use crate::services::tasks::TaskDraft;

/// Base path for the collection, used to build pagination links
const TASKS_PATH: &str = "/v1/tasks";

const TITLE_REQUIRED: &str = "Please provide a title for the task.";
const TITLE_TOO_LONG: &str = "The task title cannot exceed 255 characters.";
const DESCRIPTION_TOO_LONG: &str = "The task description cannot exceed 5000 characters.";
const STATUS_INVALID: &str =
    "The selected status is invalid. Valid options are: pending, in_progress, completed, cancelled";
const PRIORITY_INVALID: &str =
    "The selected priority is invalid. Valid options are: low, medium, high, urgent";
const DATE_INVALID: &str = "Please provide a valid date.";
const OVERDUE_INVALID: &str = "The overdue filter must be true or false.";
const SORT_ORDER_INVALID: &str = "The sort order must be asc or desc.";
const PAGE_INVALID: &str = "The page must be a positive integer.";
const PER_PAGE_INVALID: &str = "The per_page must be a positive integer.";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

/// Trims and treats the empty string as absent
fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Deserializes a field that distinguishes absent from null
///
/// Missing stays `None` via `#[serde(default)]`; an explicit `null`
/// becomes `Some(None)`; a value becomes `Some(Some(v))`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// List query parameters, raw
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
    pub due_date_from: Option<String>,
    pub due_date_to: Option<String>,
    pub overdue: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListTasksQuery {
    /// Parses the raw parameters into a filter and a page request
    ///
    /// Unknown `sort_by` values fall back to the default ordering rather
    /// than erroring; everything else unparseable is a field-keyed 422.
    pub fn into_parts(
        self,
        max_per_page: i64,
    ) -> Result<(TaskFilter, PageRequest), ApiError> {
        let mut errors = FieldErrors::new();
        let mut filter = TaskFilter::default();

        if let Some(raw) = self.status.and_then(non_empty) {
            match TaskStatus::parse(&raw) {
                Some(status) => filter.status = Some(status),
                None => push_error(&mut errors, "status", STATUS_INVALID),
            }
        }

        if let Some(raw) = self.priority.and_then(non_empty) {
            match TaskPriority::parse(&raw) {
                Some(priority) => filter.priority = Some(priority),
                None => push_error(&mut errors, "priority", PRIORITY_INVALID),
            }
        }

        filter.search = self.search.and_then(non_empty);

        if let Some(raw) = self.due_date_from.and_then(non_empty) {
            match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
                Ok(date) => filter.due_date_from = Some(date),
                Err(_) => push_error(&mut errors, "due_date_from", DATE_INVALID),
            }
        }

        if let Some(raw) = self.due_date_to.and_then(non_empty) {
            match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
                Ok(date) => filter.due_date_to = Some(date),
                Err(_) => push_error(&mut errors, "due_date_to", DATE_INVALID),
            }
        }

        if let Some(raw) = self.overdue.and_then(non_empty) {
            match raw.as_str() {
                "true" | "1" => filter.overdue = true,
                "false" | "0" => {}
                _ => push_error(&mut errors, "overdue", OVERDUE_INVALID),
            }
        }

        filter.sort.field = self
            .sort_by
            .and_then(non_empty)
            .as_deref()
            .and_then(SortField::parse);

        if let Some(raw) = self.sort_order.and_then(non_empty) {
            match SortOrder::parse(&raw) {
                Some(order) => filter.sort.order = order,
                None => push_error(&mut errors, "sort_order", SORT_ORDER_INVALID),
            }
        }

        let page = match self.page.and_then(non_empty) {
            None => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    push_error(&mut errors, "page", PAGE_INVALID);
                    1
                }
            },
        };

        let per_page = match self.per_page.and_then(non_empty) {
            None => DEFAULT_PER_PAGE,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    push_error(&mut errors, "per_page", PER_PAGE_INVALID);
                    DEFAULT_PER_PAGE
                }
            },
        };

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok((filter, PageRequest::new(page, per_page, max_per_page)))
    }
}

/// Create request body, raw
#[derive(Debug, Default, Deserialize)]
pub struct StoreTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

impl StoreTaskRequest {
    pub fn into_draft(self) -> Result<TaskDraft, ApiError> {
        let mut errors = FieldErrors::new();

        let title = match self.title.and_then(non_empty) {
            Some(title) if title.chars().count() <= 255 => Some(title),
            Some(_) => {
                push_error(&mut errors, "title", TITLE_TOO_LONG);
                None
            }
            None => {
                push_error(&mut errors, "title", TITLE_REQUIRED);
                None
            }
        };

        let description = match self.description.and_then(non_empty) {
            Some(description) if description.chars().count() <= 5000 => Some(description),
            Some(_) => {
                push_error(&mut errors, "description", DESCRIPTION_TOO_LONG);
                None
            }
            None => None,
        };

        let status = match self.status.and_then(non_empty) {
            None => None,
            Some(raw) => match TaskStatus::parse(&raw) {
                Some(status) => Some(status),
                None => {
                    push_error(&mut errors, "status", STATUS_INVALID);
                    None
                }
            },
        };

        let priority = match self.priority.and_then(non_empty) {
            None => None,
            Some(raw) => match TaskPriority::parse(&raw) {
                Some(priority) => Some(priority),
                None => {
                    push_error(&mut errors, "priority", PRIORITY_INVALID);
                    None
                }
            },
        };

        let due_date = match self.due_date.and_then(non_empty) {
            None => None,
            Some(raw) => match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    push_error(&mut errors, "due_date", DATE_INVALID);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(TaskDraft {
            title: title.unwrap_or_default(),
            description,
            status,
            priority,
            due_date,
        })
    }
}

/// Update request body, raw, tri-state per field
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub priority: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

impl UpdateTaskRequest {
    pub fn into_changes(self) -> Result<TaskChanges, ApiError> {
        let mut errors = FieldErrors::new();
        let mut changes = TaskChanges::default();

        if let Some(value) = self.title {
            match value.and_then(non_empty) {
                Some(title) if title.chars().count() <= 255 => changes.title = Some(title),
                Some(_) => push_error(&mut errors, "title", TITLE_TOO_LONG),
                None => push_error(&mut errors, "title", TITLE_REQUIRED),
            }
        }

        if let Some(value) = self.description {
            match value.and_then(non_empty) {
                Some(description) if description.chars().count() <= 5000 => {
                    changes.description = Some(Some(description));
                }
                Some(_) => push_error(&mut errors, "description", DESCRIPTION_TOO_LONG),
                None => changes.description = Some(None),
            }
        }

        if let Some(value) = self.status {
            match value.and_then(non_empty).and_then(|raw| TaskStatus::parse(&raw)) {
                Some(status) => changes.status = Some(status),
                None => push_error(&mut errors, "status", STATUS_INVALID),
            }
        }

        if let Some(value) = self.priority {
            match value
                .and_then(non_empty)
                .and_then(|raw| TaskPriority::parse(&raw))
            {
                Some(priority) => changes.priority = Some(priority),
                None => push_error(&mut errors, "priority", PRIORITY_INVALID),
            }
        }

        if let Some(value) = self.due_date {
            match value.and_then(non_empty) {
                None => changes.due_date = Some(None),
                Some(raw) => match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
                    Ok(date) => changes.due_date = Some(Some(date)),
                    Err(_) => push_error(&mut errors, "due_date", DATE_INVALID),
                },
            }
        }

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(changes)
    }
}

/// Route ids are strings so an unparseable value maps to the same 404 a
/// missing task gets, instead of a path-rejection
fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Task not found".to_string()))
}

/// List the user's tasks
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks?status=pending&priority=high&search=report&sort_by=due_date&sort_order=asc&page=2&per_page=20
/// ```
pub async fn index(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<ListEnvelope<TaskResource>>> {
    let (filter, page_request) = query.into_parts(state.config.pagination.max_per_page)?;

    let page = state
        .tasks
        .list_tasks(current.user.id, &filter, page_request)
        .await?;

    let today = Utc::now().date_naive();
    let page = page.map(|task| TaskResource::from_task(&task, today));

    Ok(Json(ListEnvelope::new(
        "Tasks retrieved successfully",
        TASKS_PATH,
        page,
    )))
}

/// Create a task
pub async fn store(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<StoreTaskRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<TaskResource>>)> {
    let draft = req.into_draft()?;

    let task = state.tasks.create_task(current.user.id, draft).await?;
    let today = Utc::now().date_naive();

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(
            "Task created successfully",
            TaskResource::from_task(&task, today),
        )),
    ))
}

/// Fetch one task
pub async fn show(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<TaskResource>>> {
    let task_id = parse_task_id(&id)?;

    let task = state.tasks.get_task(current.user.id, task_id).await?;
    let today = Utc::now().date_naive();

    Ok(Json(Envelope::new(
        "Task retrieved successfully",
        TaskResource::from_task(&task, today),
    )))
}

/// Apply a partial update
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Envelope<TaskResource>>> {
    let task_id = parse_task_id(&id)?;
    let changes = req.into_changes()?;

    let task = state
        .tasks
        .update_task(current.user.id, task_id, changes)
        .await?;
    let today = Utc::now().date_naive();

    Ok(Json(Envelope::new(
        "Task updated successfully",
        TaskResource::from_task(&task, today),
    )))
}

/// Soft-delete a task
pub async fn destroy(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Option<()>>>> {
    let task_id = parse_task_id(&id)?;

    state.tasks.delete_task(current.user.id, task_id).await?;

    Ok(Json(message_only("Task deleted successfully")))
}

/// Flip the task between completed and pending
pub async fn toggle(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<TaskResource>>> {
    let task_id = parse_task_id(&id)?;

    let task = state.tasks.toggle_task(current.user.id, task_id).await?;
    let today = Utc::now().date_naive();

    Ok(Json(Envelope::new(
        "Task status toggled successfully",
        TaskResource::from_task(&task, today),
    )))
}
