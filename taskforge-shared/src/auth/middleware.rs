/// Bearer token authentication
///
/// This module turns an `Authorization: Bearer <token>` header into an
/// authenticated [`CurrentUser`]. The API crate wraps [`authenticate`] in an
/// Axum middleware layer that stores the result in request extensions, so
/// handlers can extract it with `Extension<CurrentUser>`.
///
/// # Flow
///
/// 1. [`extract_bearer_token`] pulls the token out of the header
/// 2. The token format is checked before any database work
/// 3. The token hash is looked up, which also stamps `last_used_at`
/// 4. The owning user is loaded and returned as [`CurrentUser`]
///
/// # Example
///
/// ```no_run
/// use taskforge_shared::auth::middleware::{authenticate, extract_bearer_token};
/// use axum::http::HeaderMap;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, headers: HeaderMap) -> Result<(), Box<dyn std::error::Error>> {
/// let token = extract_bearer_token(&headers)?;
/// let current = authenticate(&pool, token).await?;
/// println!("authenticated as {}", current.user.email);
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::token::validate_token_format;
use crate::models::access_token::AccessToken;
use crate::models::user::User;

/// Authenticated request context
///
/// Carries the full user row plus the id of the token that authenticated the
/// request, so logout can revoke exactly that token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The authenticated user
    pub user: User,

    /// Id of the access token used on this request
    pub token_id: Uuid,
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header was sent
    #[error("Missing bearer token")]
    MissingToken,

    /// Authorization header is present but not a well-formed bearer token
    #[error("Malformed bearer token")]
    InvalidFormat,

    /// Token is unknown, expired, or revoked
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Database error during lookup
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Extracts the bearer token from request headers
///
/// # Arguments
///
/// * `headers` - Request header map
///
/// # Returns
///
/// The token portion of `Authorization: Bearer <token>`
///
/// # Errors
///
/// - [`AuthError::MissingToken`] when no Authorization header is present
/// - [`AuthError::InvalidFormat`] when the header is not a bearer scheme
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let value = value.to_str().map_err(|_| AuthError::InvalidFormat)?;

    value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)
}

/// Authenticates a plaintext bearer token
///
/// Checks the token format, matches its hash against stored tokens
/// (ignoring expired ones), and loads the owning user. The matching
/// token's `last_used_at` is updated as a side effect.
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `token` - Plaintext token from the Authorization header
///
/// # Errors
///
/// - [`AuthError::InvalidFormat`] when the token fails the format check
/// - [`AuthError::InvalidToken`] when no live token row matches
/// - [`AuthError::Database`] on query failure
pub async fn authenticate(pool: &PgPool, token: &str) -> Result<CurrentUser, AuthError> {
    // Cheap rejection before touching the database
    if !validate_token_format(token) {
        return Err(AuthError::InvalidFormat);
    }

    let access_token = AccessToken::find_valid(pool, token)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    // A token row can outlive its user only briefly (FK cascade), but the
    // window exists, so treat a missing user as an invalid token.
    let user = User::find_by_id(pool, access_token.user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    Ok(CurrentUser {
        user,
        token_id: access_token.id,
    })
}
