/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which converts to the
/// `{success: false, message, errors?}` envelope with the right status code.
///
/// # Status Mapping
///
/// | Variant        | Status | Body message                  |
/// |----------------|--------|-------------------------------|
/// | `Unauthorized` | 401    | variant message               |
/// | `Forbidden`    | 403    | variant message               |
/// | `NotFound`     | 404    | variant message               |
/// | `Validation`   | 422    | "Validation failed" + errors  |
/// | `Internal`     | 500    | "An internal error occurred"  |
///
/// Internal error detail is logged server-side and never sent to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use taskforge_shared::auth::middleware::AuthError;
use taskforge_shared::auth::password::PasswordError;
use taskforge_shared::repo::RepoError;

use crate::services::auth::AuthServiceError;
use crate::services::tasks::TaskError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Field name to list of messages, ordered for stable response bodies
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Unprocessable entity (422) - validation errors per field
    Validation(FieldErrors),

    /// Internal server error (500)
    Internal(String),
}

impl ApiError {
    /// Builds a validation error for a single field
    pub fn validation(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        ApiError::Validation(errors)
    }
}

/// Error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false` for errors
    pub success: bool,

    /// Human-readable error message
    pub message: String,

    /// Per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} fields", errors.len())
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorBody {
            success: false,
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// A unique violation on the users email constraint is reported the same
/// way the registration validation reports it, so concurrent registrations
/// racing past the lookup still get a 422 rather than a 500.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::validation(
                            "email",
                            "The email has already been taken.",
                        );
                    }
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert repository errors to API errors
impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Database(e) => ApiError::from(e),
        }
    }
}

/// Convert authentication errors to API errors
///
/// Everything except a database failure collapses into the same 401 body,
/// so responses do not reveal whether a token was missing, malformed, or
/// expired.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(e) => ApiError::from(e),
            AuthError::MissingToken | AuthError::InvalidFormat | AuthError::InvalidToken => {
                ApiError::Unauthorized("Unauthenticated.".to_string())
            }
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert task service errors to API errors
impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound => ApiError::NotFound("Task not found".to_string()),
            TaskError::Forbidden => {
                ApiError::Forbidden("You do not have access to this task".to_string())
            }
            TaskError::Repo(e) => e.into(),
        }
    }
}

/// Convert auth service errors to API errors
impl From<AuthServiceError> for ApiError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => ApiError::Unauthorized(
                "Invalid credentials. Please check your email and password.".to_string(),
            ),
            AuthServiceError::EmailTaken => {
                ApiError::validation("email", "The email has already been taken.")
            }
            AuthServiceError::Password(e) => e.into(),
            AuthServiceError::Repo(e) => e.into(),
        }
    }
}

/// Convert validator errors to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();

        for (field, field_errors) in err.field_errors() {
            let messages = errors.entry(field.to_string()).or_default();
            for error in field_errors {
                messages.push(
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "This value is invalid.".to_string()),
                );
            }
        }

        ApiError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Unauthorized("Unauthenticated.".to_string());
        assert_eq!(err.to_string(), "Unauthorized: Unauthenticated.");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");

        let err = ApiError::validation("title", "Please provide a title for the task.");
        assert_eq!(err.to_string(), "Validation failed: 1 fields");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthorized("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("f", "m").into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_omits_empty_errors() {
        let body = ErrorBody {
            success: false,
            message: "Task not found".to_string(),
            errors: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Task not found");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_error_body_includes_field_errors() {
        let mut errors = FieldErrors::new();
        errors.insert(
            "title".to_string(),
            vec!["Please provide a title for the task.".to_string()],
        );

        let body = ErrorBody {
            success: false,
            message: "Validation failed".to_string(),
            errors: Some(errors),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["errors"]["title"][0],
            "Please provide a title for the task."
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_auth_errors_collapse_to_unauthenticated() {
        for source in [
            AuthError::MissingToken,
            AuthError::InvalidFormat,
            AuthError::InvalidToken,
        ] {
            let err = ApiError::from(source);
            match err {
                ApiError::Unauthorized(msg) => assert_eq!(msg, "Unauthenticated."),
                other => panic!("expected Unauthorized, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_task_error_messages() {
        let err = ApiError::from(TaskError::NotFound);
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "Task not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }

        let err = ApiError::from(TaskError::Forbidden);
        match err {
            ApiError::Forbidden(msg) => {
                assert_eq!(msg, "You do not have access to this task")
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_credentials_message() {
        let err = ApiError::from(AuthServiceError::InvalidCredentials);
        match err {
            ApiError::Unauthorized(msg) => {
                assert_eq!(msg, "Invalid credentials. Please check your email and password.")
            }
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_email_taken_is_a_field_error() {
        let err = ApiError::from(AuthServiceError::EmailTaken);
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors["email"], vec!["The email has already been taken."]);
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }
}
