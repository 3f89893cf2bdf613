/// Data models for Taskforge
///
/// Users and access tokens carry their own sqlx operations, keeping the
/// credential plumbing close to the schema. Tasks are persisted through the
/// repository port in `crate::repo` instead, so the domain service can be
/// tested without a database.
///
/// # Models
///
/// - `user`: User accounts
/// - `access_token`: Bearer tokens (hashed at rest)
/// - `task`: Tasks, their enums, and the pure domain rules

pub mod access_token;
pub mod task;
pub mod user;
