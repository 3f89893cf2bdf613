/// Personal access token utilities
///
/// This module generates and validates the bearer tokens handed out at
/// registration and login. It works in conjunction with the
/// `models::access_token` module for database operations.
///
/// # Security
///
/// - **Format**: `task_{40_chars}` (prefix + 40 random alphanumeric chars)
/// - **Storage**: Tokens are hashed with SHA-256 before storage; the
///   plaintext is returned to the client exactly once
/// - **Lookup**: Authentication hashes the presented token and matches the
///   hash in the database, so no plaintext ever lands in a table
///
/// # Token Format
///
/// Tokens follow the pattern: `task_abcd1234efgh5678...` (45 chars total)
/// - Prefix: "task_" (5 chars)
/// - Random part: 40 alphanumeric chars (base62: [A-Za-z0-9])
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::token::{generate_token, hash_token, validate_token_format};
///
/// // Generate a new token
/// let (token, hash) = generate_token();
/// assert!(token.starts_with("task_"));
/// assert_eq!(token.len(), 45);
///
/// // Validate format
/// assert!(validate_token_format(&token));
///
/// // Hash matches
/// let computed_hash = hash_token(&token);
/// assert_eq!(hash, computed_hash);
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of the token (characters)
const TOKEN_RANDOM_LENGTH: usize = 40;

/// Token prefix
const TOKEN_PREFIX: &str = "task_";

/// Total length of an access token (prefix + random)
pub const TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Length of the identifying prefix stored alongside the hash
///
/// The first characters of a token are kept in plaintext so support can
/// match a leaked token to its database row without storing the whole thing.
pub const STORED_PREFIX_LENGTH: usize = 10;

/// Generates a new access token
///
/// Creates a cryptographically random token with the format `task_{40_chars}`.
/// Also returns the SHA-256 hash for database storage.
///
/// # Returns
///
/// Tuple of (plaintext_token, sha256_hash)
///
/// # Security
///
/// - Uses `rand::thread_rng()` for cryptographic randomness
/// - Token space: 62^40 combinations
/// - Hash prevents plaintext storage
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::token::generate_token;
///
/// let (token, hash) = generate_token();
/// assert!(token.starts_with("task_"));
/// assert_eq!(token.len(), 45);
/// assert_eq!(hash.len(), 64); // SHA-256 hex is 64 chars
/// ```
pub fn generate_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_token(&token);

    (token, hash)
}

/// Generates a random alphanumeric string
///
/// Uses base62 encoding (A-Z, a-z, 0-9) for header-safe tokens.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes an access token using SHA-256
///
/// # Arguments
///
/// * `token` - Plaintext token
///
/// # Returns
///
/// Hex-encoded SHA-256 hash (64 characters)
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::token::hash_token;
///
/// let hash = hash_token("task_test123");
/// assert_eq!(hash.len(), 64);
///
/// // Same input = same hash (deterministic)
/// let hash2 = hash_token("task_test123");
/// assert_eq!(hash, hash2);
/// ```
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validates access token format
///
/// Checks that the token:
/// - Starts with "task_"
/// - Has correct length (45 chars)
/// - Contains only alphanumeric characters after the prefix
///
/// A format check up front lets authentication reject garbage without a
/// database round trip.
///
/// # Arguments
///
/// * `token` - Token to validate
///
/// # Returns
///
/// `true` if format is valid, `false` otherwise
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::token::validate_token_format;
///
/// // Valid
/// assert!(validate_token_format("task_abcdefghijklmnopqrstuvwxyz01234567890123"));
///
/// // Invalid - wrong prefix
/// assert!(!validate_token_format("axon_abcdefghijklmnopqrstuvwxyz01234567890123"));
///
/// // Invalid - too short
/// assert!(!validate_token_format("task_short"));
/// ```
pub fn validate_token_format(token: &str) -> bool {
    // Check length
    if token.len() != TOKEN_LENGTH {
        return false;
    }

    // Check prefix
    if !token.starts_with(TOKEN_PREFIX) {
        return false;
    }

    // Check random part is alphanumeric
    let random_part = &token[TOKEN_PREFIX.len()..];
    random_part.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Extracts the identifying prefix of a token for storage
///
/// Returns the first [`STORED_PREFIX_LENGTH`] characters, or the whole
/// token when it is shorter than that.
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::token::extract_prefix;
///
/// assert_eq!(extract_prefix("task_abcdefghij"), "task_abcde");
/// assert_eq!(extract_prefix("short"), "short");
/// ```
pub fn extract_prefix(token: &str) -> String {
    token.chars().take(STORED_PREFIX_LENGTH).collect()
}
