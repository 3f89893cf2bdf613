/// Authentication utilities
///
/// This module provides the authentication primitives for Taskforge:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Personal access token generation and validation utilities
/// - [`middleware`]: Bearer token authentication for Axum request handling
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Access Tokens**: Secure random generation with SHA-256 hashing
/// - **Single-use Plaintext**: Token plaintext is returned once and never stored
///
/// # Example
///
/// ```no_run
/// use taskforge_shared::auth::password::{hash_password, verify_password};
/// use taskforge_shared::auth::token::generate_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Token issuance
/// let (plaintext, stored_hash) = generate_token();
/// assert!(plaintext.starts_with("task_"));
/// # Ok(())
/// # }
/// ```

pub mod middleware;
pub mod password;
pub mod token;
