/// Task list filtering and sorting
///
/// [`TaskFilter`] is the parsed, typed form of the task list query string.
/// The HTTP layer builds one from raw parameters; the Postgres repository
/// translates it into WHERE/ORDER BY clauses. [`TaskFilter::matches`] and
/// [`TaskSort::apply`] are the same semantics expressed over in-memory
/// tasks, and serve as the reference the SQL translation is tested against.
///
/// # Filter Semantics
///
/// All active filters combine with AND:
///
/// - `status` / `priority`: exact match
/// - `search`: case-insensitive substring over title or description
/// - `due_date_from` / `due_date_to`: inclusive bounds; tasks without a due
///   date never match a bound
/// - `overdue`: due date in the past and status neither completed nor
///   cancelled
///
/// The `overdue` filter is stricter than the per-task overdue flag: the flag
/// exempts only completed tasks, the filter exempts cancelled ones too. The
/// flag answers "is this task late", the filter answers "is this task late
/// and still actionable".

use chrono::NaiveDate;

use crate::models::task::{Task, TaskPriority, TaskStatus};

/// Fields a task list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Status,
    Priority,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Column name as it appears in the query string and the tasks table
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Status => "status",
            SortField::Priority => "priority",
            SortField::DueDate => "due_date",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    /// Parses a `sort_by` query value; returns `None` for anything outside
    /// the sortable set
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "title" => Some(SortField::Title),
            "status" => Some(SortField::Status),
            "priority" => Some(SortField::Priority),
            "due_date" => Some(SortField::DueDate),
            "created_at" => Some(SortField::CreatedAt),
            "updated_at" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }
}

/// Sort direction, descending when not specified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Parses a `sort_order` query value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Requested ordering for a task list
///
/// A `field` of `None` means the client sent no recognized `sort_by`, which
/// falls back to newest-first regardless of `order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskSort {
    /// Recognized sort field, if any
    pub field: Option<SortField>,

    /// Direction, only honored when `field` is set
    pub order: SortOrder,
}

impl TaskSort {
    /// Sorts tasks in place according to this ordering
    ///
    /// Status sorts by enum declaration order, priority by severity
    /// (urgent highest), and due dates place tasks without one first in
    /// ascending order and last in descending order. The Postgres
    /// repository emits ORDER BY clauses that match each of these.
    pub fn apply(&self, tasks: &mut [Task]) {
        let Some(field) = self.field else {
            tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            return;
        };

        tasks.sort_by(|a, b| {
            let ordering = match field {
                SortField::Title => a.title.cmp(&b.title),
                SortField::Status => a.status.cmp(&b.status),
                SortField::Priority => a.priority.severity().cmp(&b.priority.severity()),
                SortField::DueDate => a.due_date.cmp(&b.due_date),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };

            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

/// Parsed task list filter
///
/// `Default` is the unfiltered list: no constraints, newest-first ordering.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Only tasks with this status
    pub status: Option<TaskStatus>,

    /// Only tasks with this priority
    pub priority: Option<TaskPriority>,

    /// Case-insensitive substring over title and description
    pub search: Option<String>,

    /// Only tasks due on or after this date
    pub due_date_from: Option<NaiveDate>,

    /// Only tasks due on or before this date
    pub due_date_to: Option<NaiveDate>,

    /// Only tasks past their due date and still actionable
    pub overdue: bool,

    /// Requested ordering
    pub sort: TaskSort,
}

impl TaskFilter {
    /// True when the task passes every active filter
    ///
    /// `today` anchors the overdue comparison so callers and tests share
    /// one clock.
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }

        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }

        if let Some(ref search) = self.search {
            let term = search.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&term);
            let in_description = task
                .description
                .as_ref()
                .map(|d| d.to_lowercase().contains(&term))
                .unwrap_or(false);

            if !in_title && !in_description {
                return false;
            }
        }

        if let Some(from) = self.due_date_from {
            match task.due_date {
                Some(due_date) if due_date >= from => {}
                _ => return false,
            }
        }

        if let Some(to) = self.due_date_to {
            match task.due_date {
                Some(due_date) if due_date <= to => {}
                _ => return false,
            }
        }

        if self.overdue {
            let past_due = task
                .due_date
                .map(|due_date| due_date < today)
                .unwrap_or(false);
            let actionable = task.status != TaskStatus::Completed
                && task.status != TaskStatus::Cancelled;

            if !past_due || !actionable {
                return false;
            }
        }

        true
    }
}
