/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Create an account, returns a token
/// - `POST /v1/auth/login` - Exchange credentials for a token
/// - `POST /v1/auth/logout` - Revoke the presented token
/// - `GET /v1/auth/user` - The account behind the presented token
///
/// Register and login answer with the same payload: the user resource, a
/// plaintext bearer token, and `token_type: "Bearer"`. The request DTOs
/// keep every field optional at the serde level so that a missing field
/// becomes a field-keyed validation error in the standard envelope
/// instead of a body-rejection from the JSON extractor.

use crate::{
    app::AppState,
    error::ApiResult,
    resources::UserResource,
    response::{message_only, Envelope},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use taskforge_shared::auth::middleware::CurrentUser;
use validator::{Validate, ValidationError};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, required, at most 255 characters
    #[validate(
        required(message = "The name field is required."),
        custom(function = validate_name)
    )]
    pub name: Option<String>,

    /// Email address, must be unique
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,

    /// Password, at least 8 characters
    #[validate(
        required(message = "The password field is required."),
        length(min = 8, message = "The password field must be at least 8 characters.")
    )]
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,

    /// Password
    #[validate(
        required(message = "The password field is required."),
        length(min = 1, message = "The password field is required.")
    )]
    pub password: Option<String>,
}

/// Payload for register and login responses
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserResource,
    pub token: String,
    pub token_type: &'static str,
}

/// Payload for the current-user endpoint
#[derive(Debug, Serialize)]
pub struct CurrentUserPayload {
    pub user: UserResource,
}

impl AuthPayload {
    fn new(user: UserResource, token: String) -> Self {
        Self {
            user,
            token,
            token_type: "Bearer",
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("The name field is required.".into());
        return Err(err);
    }
    if name.chars().count() > 255 {
        let mut err = ValidationError::new("length");
        err.message = Some("The name may not be greater than 255 characters.".into());
        return Err(err);
    }
    Ok(())
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "correct horse battery"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed, including an already
///   registered email
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<AuthPayload>>)> {
    req.validate()?;

    let session = state
        .auth
        .register(
            req.name.unwrap_or_default(),
            req.email.unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    let payload = AuthPayload::new(UserResource::from_user(&session.user), session.token);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(
            "Registration successful. Welcome aboard!",
            payload,
        )),
    ))
}

/// Login with email and password
///
/// Wrong email and wrong password are indistinguishable in the response.
///
/// # Errors
///
/// - `401 Unauthorized`: invalid credentials
/// - `422 Unprocessable Entity`: validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Envelope<AuthPayload>>> {
    req.validate()?;

    let session = state
        .auth
        .login(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    let payload = AuthPayload::new(UserResource::from_user(&session.user), session.token);

    Ok(Json(Envelope::new(
        "Login successful. Welcome back!",
        payload,
    )))
}

/// Revoke the token that authenticated this request
///
/// Other sessions of the same account keep working.
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Envelope<Option<()>>>> {
    state.auth.logout(&current).await?;

    Ok(Json(message_only("Logout successful. See you soon!")))
}

/// The account behind the presented token
pub async fn current_user(
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Envelope<CurrentUserPayload>>> {
    Ok(Json(Envelope::new(
        "User retrieved successfully",
        CurrentUserPayload {
            user: UserResource::from_user(&current.user),
        },
    )))
}
