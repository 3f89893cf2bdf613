//! Registration, login, and token lifecycle
//!
//! Login and registration both end the same way: a fresh personal access
//! token the client sends as a bearer credential from then on. Logout
//! revokes exactly the token that authenticated the request, so other
//! devices stay signed in; [`AuthService::logout_all`] is the big hammer.
//!
//! Failed logins never say which half was wrong. An unknown email and a
//! bad password produce the identical error.
//!
//! Storage is reached only through the [`AuthRepository`] port, so the
//! whole register/login/logout sequence is tested against an in-memory
//! store.

use std::sync::Arc;

use taskforge_shared::auth::middleware::CurrentUser;
use taskforge_shared::auth::password::{hash_password, verify_password, PasswordError};
use taskforge_shared::models::user::{CreateUser, User};
use taskforge_shared::repo::{AuthRepository, RepoError};

use super::audit::{AuditEvent, AuditLog};

/// Name stored with every token issued through register/login
const TOKEN_NAME: &str = "auth_token";

/// Error type for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Unknown email or wrong password, deliberately indistinguishable
    #[error("Invalid credentials. Please check your email and password.")]
    InvalidCredentials,

    /// Another account already uses this email
    #[error("The email has already been taken.")]
    EmailTaken,

    /// Password hashing or verification failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Storage failure
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// A signed-in user together with their new plaintext token
///
/// The token only exists here and in the response that carries it to the
/// client; storage keeps a hash.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Account operations: register, login, logout
#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    audit: Arc<dyn AuditLog>,
    token_ttl_days: Option<i64>,
}

impl AuthService {
    pub fn new(
        repo: Arc<dyn AuthRepository>,
        audit: Arc<dyn AuditLog>,
        token_ttl_days: Option<i64>,
    ) -> Self {
        Self {
            repo,
            audit,
            token_ttl_days,
        }
    }

    /// Creates an account and signs it in
    ///
    /// The email check here gives the common case a friendly error; the
    /// unique index on users.email still catches the race where two
    /// registrations interleave.
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: &str,
    ) -> Result<AuthSession, AuthServiceError> {
        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .repo
            .create_user(CreateUser {
                name,
                email,
                password_hash,
            })
            .await?;

        let (_, token) = self
            .repo
            .issue_token(user.id, TOKEN_NAME, self.token_ttl_days)
            .await?;

        self.audit.record(AuditEvent::UserRegistered {
            user_id: user.id,
            email: user.email.clone(),
        });

        Ok(AuthSession { user, token })
    }

    /// Verifies credentials and issues a fresh token
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthServiceError> {
        let user = self
            .repo
            .find_user_by_email(email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let (_, token) = self
            .repo
            .issue_token(user.id, TOKEN_NAME, self.token_ttl_days)
            .await?;

        self.audit.record(AuditEvent::UserLoggedIn {
            user_id: user.id,
            email: user.email.clone(),
        });

        Ok(AuthSession { user, token })
    }

    /// Revokes the token that authenticated this request
    pub async fn logout(&self, current: &CurrentUser) -> Result<(), AuthServiceError> {
        self.repo.revoke_token(current.token_id).await?;

        self.audit.record(AuditEvent::UserLoggedOut {
            user_id: current.user.id,
            email: current.user.email.clone(),
        });

        Ok(())
    }

    /// Revokes every token the user holds, returning how many
    pub async fn logout_all(&self, current: &CurrentUser) -> Result<u64, AuthServiceError> {
        let revoked = self.repo.revoke_user_tokens(current.user.id).await?;

        self.audit.record(AuditEvent::UserLoggedOutEverywhere {
            user_id: current.user.id,
            email: current.user.email.clone(),
        });

        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use taskforge_shared::auth::token::{extract_prefix, generate_token, hash_token};
    use taskforge_shared::models::access_token::AccessToken;

    /// In-memory account and token store mirroring the Postgres semantics:
    /// case-insensitive email lookup, hashes stored instead of plaintext,
    /// expired tokens invisible to lookup.
    #[derive(Default)]
    struct MemoryAuthRepo {
        users: Mutex<Vec<User>>,
        tokens: Mutex<Vec<AccessToken>>,
    }

    #[async_trait]
    impl AuthRepository for MemoryAuthRepo {
        async fn create_user(&self, data: CreateUser) -> Result<User, RepoError> {
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                name: data.name,
                email: data.email,
                email_verified_at: None,
                password_hash: data.password_hash,
                created_at: now,
                updated_at: now,
            };

            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        async fn issue_token(
            &self,
            user_id: Uuid,
            name: &str,
            ttl_days: Option<i64>,
        ) -> Result<(AccessToken, String), RepoError> {
            let (plaintext, token_hash) = generate_token();
            let token = AccessToken {
                id: Uuid::new_v4(),
                user_id,
                name: name.to_string(),
                token_prefix: extract_prefix(&plaintext),
                token_hash,
                last_used_at: None,
                expires_at: ttl_days.map(|days| Utc::now() + Duration::days(days)),
                created_at: Utc::now(),
            };

            self.tokens.lock().unwrap().push(token.clone());
            Ok((token, plaintext))
        }

        async fn find_valid_token(
            &self,
            plaintext: &str,
        ) -> Result<Option<AccessToken>, RepoError> {
            let hash = hash_token(plaintext);
            let mut tokens = self.tokens.lock().unwrap();

            let Some(token) = tokens
                .iter_mut()
                .find(|t| t.token_hash == hash && !t.is_expired())
            else {
                return Ok(None);
            };

            token.last_used_at = Some(Utc::now());
            Ok(Some(token.clone()))
        }

        async fn revoke_token(&self, id: Uuid) -> Result<bool, RepoError> {
            let mut tokens = self.tokens.lock().unwrap();
            let before = tokens.len();
            tokens.retain(|t| t.id != id);
            Ok(tokens.len() < before)
        }

        async fn revoke_user_tokens(&self, user_id: Uuid) -> Result<u64, RepoError> {
            let mut tokens = self.tokens.lock().unwrap();
            let before = tokens.len();
            tokens.retain(|t| t.user_id != user_id);
            Ok((before - tokens.len()) as u64)
        }
    }

    /// Audit sink that stores events for assertions
    #[derive(Default)]
    struct RecordingAudit {
        events: Mutex<Vec<AuditEvent>>,
    }

    impl RecordingAudit {
        fn events(&self) -> Vec<AuditEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl AuditLog for RecordingAudit {
        fn record(&self, event: AuditEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn service(ttl_days: Option<i64>) -> (AuthService, Arc<MemoryAuthRepo>, Arc<RecordingAudit>) {
        let repo = Arc::new(MemoryAuthRepo::default());
        let audit = Arc::new(RecordingAudit::default());
        let service = AuthService::new(repo.clone(), audit.clone(), ttl_days);
        (service, repo, audit)
    }

    async fn current_user(repo: &MemoryAuthRepo, session: &AuthSession) -> CurrentUser {
        let token = repo
            .find_valid_token(&session.token)
            .await
            .unwrap()
            .expect("session token should resolve");

        CurrentUser {
            user: session.user.clone(),
            token_id: token.id,
        }
    }

    #[tokio::test]
    async fn test_register_and_login_issue_distinct_usable_tokens() {
        let (service, repo, audit) = service(None);

        let registered = service
            .register(
                "Avery".to_string(),
                "avery@example.com".to_string(),
                "correct horse battery",
            )
            .await
            .unwrap();

        let logged_in = service
            .login("avery@example.com", "correct horse battery")
            .await
            .unwrap();

        assert_ne!(registered.token, logged_in.token);
        assert_eq!(logged_in.user.id, registered.user.id);

        // Both sessions resolve independently to the same account
        for session in [&registered, &logged_in] {
            let token = repo
                .find_valid_token(&session.token)
                .await
                .unwrap()
                .expect("token should resolve");
            assert_eq!(token.user_id, registered.user.id);
            assert_eq!(token.name, "auth_token");
        }

        assert_eq!(
            audit.events(),
            vec![
                AuditEvent::UserRegistered {
                    user_id: registered.user.id,
                    email: "avery@example.com".to_string(),
                },
                AuditEvent::UserLoggedIn {
                    user_id: registered.user.id,
                    email: "avery@example.com".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_logout_revokes_only_the_presented_token() {
        let (service, repo, _) = service(None);

        let first = service
            .register(
                "Avery".to_string(),
                "avery@example.com".to_string(),
                "correct horse battery",
            )
            .await
            .unwrap();
        let second = service
            .login("avery@example.com", "correct horse battery")
            .await
            .unwrap();

        let current = current_user(&repo, &first).await;
        service.logout(&current).await.unwrap();

        // The presented token is dead, the other device stays signed in
        assert!(repo.find_valid_token(&first.token).await.unwrap().is_none());
        assert!(repo.find_valid_token(&second.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_logout_all_revokes_every_token() {
        let (service, repo, _) = service(None);

        let first = service
            .register(
                "Avery".to_string(),
                "avery@example.com".to_string(),
                "correct horse battery",
            )
            .await
            .unwrap();
        let second = service
            .login("avery@example.com", "correct horse battery")
            .await
            .unwrap();

        let current = current_user(&repo, &first).await;
        let revoked = service.logout_all(&current).await.unwrap();

        assert_eq!(revoked, 2);
        assert!(repo.find_valid_token(&first.token).await.unwrap().is_none());
        assert!(repo.find_valid_token(&second.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email_case_insensitively() {
        let (service, _, _) = service(None);

        service
            .register(
                "Avery".to_string(),
                "avery@example.com".to_string(),
                "correct horse battery",
            )
            .await
            .unwrap();

        let err = service
            .register(
                "Imposter".to_string(),
                "Avery@Example.com".to_string(),
                "another password",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AuthServiceError::EmailTaken));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _, _) = service(None);

        service
            .register(
                "Avery".to_string(),
                "avery@example.com".to_string(),
                "correct horse battery",
            )
            .await
            .unwrap();

        let unknown = service
            .login("nobody@example.com", "correct horse battery")
            .await
            .unwrap_err();
        let wrong = service
            .login("avery@example.com", "wrong password")
            .await
            .unwrap_err();

        assert!(matches!(unknown, AuthServiceError::InvalidCredentials));
        assert!(matches!(wrong, AuthServiceError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_expired_token_does_not_resolve() {
        // A zero-day lifetime expires the moment it is issued
        let (service, repo, _) = service(Some(0));

        let session = service
            .register(
                "Avery".to_string(),
                "avery@example.com".to_string(),
                "correct horse battery",
            )
            .await
            .unwrap();

        assert!(repo
            .find_valid_token(&session.token)
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_credential_errors_stay_vague() {
        let err = AuthServiceError::InvalidCredentials;
        assert_eq!(
            err.to_string(),
            "Invalid credentials. Please check your email and password."
        );
        assert!(!err.to_string().contains("email not found"));
        assert!(!err.to_string().contains("wrong password"));
    }

    #[test]
    fn test_duplicate_email_message() {
        assert_eq!(
            AuthServiceError::EmailTaken.to_string(),
            "The email has already been taken."
        );
    }

    #[test]
    fn test_issued_tokens_share_a_name() {
        assert_eq!(TOKEN_NAME, "auth_token");
    }
}
