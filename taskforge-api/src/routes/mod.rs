/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout, current user
/// - `tasks`: Task CRUD and the status toggle

pub mod auth;
pub mod health;
pub mod tasks;
