/// Personal access token model and database operations
///
/// Bearer tokens issued at registration and login. Tokens are opaque random
/// strings; the database keeps only a SHA-256 hash, so a leaked table never
/// yields usable credentials.
///
/// # Security
///
/// - Tokens are stored as SHA-256 hashes (never plaintext)
/// - Tokens are prefixed with "task_" for identification
/// - The full token is only returned at issuance (never again)
/// - Revocation deletes the row, so a revoked token can never resolve
/// - Tokens can optionally expire
///
/// # Schema
///
/// ```sql
/// CREATE TABLE access_tokens (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(100) NOT NULL,
///     token_prefix VARCHAR(10) NOT NULL,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     last_used_at TIMESTAMPTZ,
///     expires_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskforge_shared::models::access_token::AccessToken;
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let (record, plaintext) = AccessToken::issue(&pool, user_id, "auth_token", None).await?;
///
/// // IMPORTANT: hand plaintext to the client now - it's never shown again!
/// println!("Token: {} (prefix {})", plaintext, record.token_prefix);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::token::{extract_prefix, generate_token, hash_token};

/// Personal access token record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessToken {
    /// Unique token ID
    pub id: Uuid,

    /// User this token authenticates
    pub user_id: Uuid,

    /// Label for the token (e.g. "auth_token")
    pub name: String,

    /// First 10 characters of the token (for display: "task_ab12...")
    pub token_prefix: String,

    /// SHA-256 hash of the full token (never store plaintext!)
    pub token_hash: String,

    /// When the token last authenticated a request
    pub last_used_at: Option<DateTime<Utc>>,

    /// Optional expiration date
    pub expires_at: Option<DateTime<Utc>>,

    /// When the token was issued
    pub created_at: DateTime<Utc>,
}

impl AccessToken {
    /// Issues a new token for a user
    ///
    /// Returns both the database record and the plaintext token.
    /// **IMPORTANT**: The plaintext is only returned once and never stored!
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `user_id` - User the token authenticates
    /// * `name` - Label for the token
    /// * `ttl_days` - Optional lifetime; None means the token never expires
    ///
    /// # Returns
    ///
    /// Tuple of (AccessToken record, plaintext token string)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn issue(
        pool: &PgPool,
        user_id: Uuid,
        name: &str,
        ttl_days: Option<i64>,
    ) -> Result<(Self, String), sqlx::Error> {
        let (plaintext, token_hash) = generate_token();
        let token_prefix = extract_prefix(&plaintext);
        let expires_at = ttl_days.map(|days| Utc::now() + Duration::days(days));

        let token = sqlx::query_as::<_, AccessToken>(
            r#"
            INSERT INTO access_tokens (user_id, name, token_prefix, token_hash, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, token_prefix, token_hash,
                      last_used_at, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(token_prefix)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok((token, plaintext))
    }

    /// Resolves a plaintext token to its record if it is still valid
    ///
    /// Checks:
    /// - Token hash matches a stored token
    /// - Not expired
    ///
    /// Also touches `last_used_at` on a hit, in the same statement.
    pub async fn find_valid(
        pool: &PgPool,
        plaintext: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let token_hash = hash_token(plaintext);

        let token = sqlx::query_as::<_, AccessToken>(
            r#"
            UPDATE access_tokens
            SET last_used_at = NOW()
            WHERE token_hash = $1
              AND (expires_at IS NULL OR expires_at > NOW())
            RETURNING id, user_id, name, token_prefix, token_hash,
                      last_used_at, expires_at, created_at
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(token)
    }

    /// Revokes a token by deleting its row
    ///
    /// Returns true if a token was actually removed.
    pub async fn revoke(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Revokes every token belonging to a user
    ///
    /// Returns the number of tokens removed.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Checks if the token is expired
    ///
    /// Returns true if expires_at is set and is in the past
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            expires_at < Utc::now()
        } else {
            false
        }
    }
}
