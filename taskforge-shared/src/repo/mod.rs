/// Persistence ports
///
/// [`TaskRepository`] and [`AuthRepository`] are the seams between the
/// services and storage. Production wires in [`PgTaskRepository`] and
/// [`PgAuthRepository`]; tests implement the traits over in-memory
/// collections (tasks reuse the filter semantics from `crate::query`), so
/// service behavior is testable without a database.
///
/// Task lookups exclude soft-deleted rows. Lookups by id are deliberately
/// not user-scoped: the service needs to distinguish "no such task" from
/// "someone else's task", so ownership is its decision, not the store's.
///
/// # Example
///
/// ```no_run
/// use taskforge_shared::query::filter::TaskFilter;
/// use taskforge_shared::repo::{PgTaskRepository, TaskRepository};
/// use uuid::Uuid;
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let repo = PgTaskRepository::new(pool);
/// let tasks = repo.list_for_user(Uuid::new_v4(), &TaskFilter::default()).await?;
/// println!("{} tasks", tasks.len());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::access_token::AccessToken;
use crate::models::task::{NewTask, Task, TaskChanges, TaskStatus};
use crate::models::user::{CreateUser, User};
use crate::query::filter::TaskFilter;
use crate::query::page::{Page, PageRequest};

pub mod postgres;

pub use postgres::{PgAuthRepository, PgTaskRepository};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Underlying database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage operations for tasks
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Lists all of a user's live tasks matching the filter, sorted
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, RepoError>;

    /// Lists one page of a user's live tasks matching the filter, sorted,
    /// with the total count across all pages
    async fn paginate_for_user(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> Result<Page<Task>, RepoError>;

    /// Finds a live task by id, regardless of owner
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, RepoError>;

    /// Inserts a task and returns the stored row
    async fn create(&self, task: NewTask) -> Result<Task, RepoError>;

    /// Applies a partial update and returns the updated row
    ///
    /// Returns `None` when the task does not exist or is soft-deleted.
    /// Callers pass at least one change; an empty change set would only
    /// touch `updated_at`.
    async fn update(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>, RepoError>;

    /// Marks a task deleted; returns whether a live row was actually marked
    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Replaces the status and returns the updated row
    async fn set_status(&self, id: Uuid, status: TaskStatus)
        -> Result<Option<Task>, RepoError>;
}

/// Storage operations for accounts and their access tokens
///
/// The token methods deal in plaintext at the boundary and hashes inside:
/// `issue_token` returns the plaintext exactly once, `find_valid_token`
/// hashes what the caller presents and matches it against stored hashes,
/// skipping expired rows and touching `last_used_at` on a hit.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Inserts an account and returns the stored row
    async fn create_user(&self, user: CreateUser) -> Result<User, RepoError>;

    /// Finds an account by email, case-insensitively
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Issues a token for a user, returning the record and the plaintext
    async fn issue_token(
        &self,
        user_id: Uuid,
        name: &str,
        ttl_days: Option<i64>,
    ) -> Result<(AccessToken, String), RepoError>;

    /// Resolves a plaintext token to its record if it is still valid
    async fn find_valid_token(&self, plaintext: &str) -> Result<Option<AccessToken>, RepoError>;

    /// Revokes one token by id; returns whether a row was removed
    async fn revoke_token(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Revokes every token a user holds, returning how many
    async fn revoke_user_tokens(&self, user_id: Uuid) -> Result<u64, RepoError>;
}
