/// Integration tests for the Taskforge API
///
/// Router-level checks that hold without a live database:
/// - Health endpoint shape when the database is unreachable
/// - Bearer authentication gates on every protected route
/// - Body validation on register and login
/// - The error envelope shape (`success`, `message`, `errors`)

mod common;

use axum::http::StatusCode;
use common::{body_json, json_request, request, request_with_auth, TestApp};
use serde_json::json;

/// A syntactically valid token that matches no stored hash; useless here
/// because the pool never connects, but it must pass the format check
const WELL_FORMED_TOKEN: &str = "Bearer task_abcdefghijklmnopqrstuvwxyz01234567890123";

#[tokio::test]
async fn test_health_reports_degraded_without_database() {
    let app = TestApp::new();

    let response = app.call(request("GET", "/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new();

    let response = app.call(request("GET", "/v1/projects")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// --- authentication gates ---

#[tokio::test]
async fn test_task_routes_require_a_token() {
    let app = TestApp::new();

    for (method, uri) in [
        ("GET", "/v1/tasks"),
        ("POST", "/v1/tasks"),
        ("GET", "/v1/tasks/00000000-0000-0000-0000-000000000000"),
        ("PUT", "/v1/tasks/00000000-0000-0000-0000-000000000000"),
        ("PATCH", "/v1/tasks/00000000-0000-0000-0000-000000000000"),
        ("DELETE", "/v1/tasks/00000000-0000-0000-0000-000000000000"),
        ("PATCH", "/v1/tasks/00000000-0000-0000-0000-000000000000/toggle"),
    ] {
        let response = app.call(request(method, uri)).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri}"
        );

        let body = body_json(response).await;
        assert_eq!(body["success"], false, "{method} {uri}");
        assert_eq!(body["message"], "Unauthenticated.", "{method} {uri}");
    }
}

#[tokio::test]
async fn test_protected_auth_routes_require_a_token() {
    let app = TestApp::new();

    for (method, uri) in [("POST", "/v1/auth/logout"), ("GET", "/v1/auth/user")] {
        let response = app.call(request(method, uri)).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri}"
        );
    }
}

#[tokio::test]
async fn test_wrong_auth_scheme_is_unauthenticated() {
    let app = TestApp::new();

    let response = app
        .call(request_with_auth("GET", "/v1/tasks", "Basic dXNlcjpwYXNz"))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Unauthenticated.");
}

#[tokio::test]
async fn test_malformed_bearer_token_is_unauthenticated() {
    let app = TestApp::new();

    // Fails the token format check, so no database lookup happens and the
    // response never reveals what exactly was wrong with the token
    for token in ["Bearer garbage", "Bearer task_tooshort", "Bearer "] {
        let response = app.call(request_with_auth("GET", "/v1/tasks", token)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{token:?}");

        let body = body_json(response).await;
        assert_eq!(body["message"], "Unauthenticated.", "{token:?}");
        assert!(body.get("errors").is_none(), "{token:?}");
    }
}

#[tokio::test]
async fn test_well_formed_unknown_token_fails_at_lookup() {
    let app = TestApp::new();

    // Passes the format check, then the lookup fails because the pool
    // cannot connect; that failure must not leak as a 401
    let response = app
        .call(request_with_auth("GET", "/v1/tasks", WELL_FORMED_TOKEN))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "An internal error occurred");
}

// --- register validation ---

#[tokio::test]
async fn test_register_empty_body_lists_every_missing_field() {
    let app = TestApp::new();

    let response = app
        .call(json_request("POST", "/v1/auth/register", json!({})))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"]["name"][0], "The name field is required.");
    assert_eq!(body["errors"]["email"][0], "The email field is required.");
    assert_eq!(
        body["errors"]["password"][0],
        "The password field is required."
    );
}

#[tokio::test]
async fn test_register_rejects_bad_email_and_short_password() {
    let app = TestApp::new();

    let response = app
        .call(json_request(
            "POST",
            "/v1/auth/register",
            json!({
                "name": "Ada Lovelace",
                "email": "not-an-email",
                "password": "short",
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(
        body["errors"]["email"][0],
        "The email field must be a valid email address."
    );
    assert_eq!(
        body["errors"]["password"][0],
        "The password field must be at least 8 characters."
    );
    assert!(body["errors"].get("name").is_none());
}

// --- login validation ---

#[tokio::test]
async fn test_login_requires_email_and_password() {
    let app = TestApp::new();

    let response = app
        .call(json_request("POST", "/v1/auth/login", json!({})))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["errors"]["email"][0], "The email field is required.");
    assert_eq!(
        body["errors"]["password"][0],
        "The password field is required."
    );
}

#[tokio::test]
async fn test_login_rejects_malformed_email() {
    let app = TestApp::new();

    let response = app
        .call(json_request(
            "POST",
            "/v1/auth/login",
            json!({"email": "nope", "password": "whatever"}),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(
        body["errors"]["email"][0],
        "The email field must be a valid email address."
    );
}

// --- error envelope shape ---

#[tokio::test]
async fn test_validation_errors_keep_the_envelope_shape() {
    let app = TestApp::new();

    let response = app
        .call(json_request("POST", "/v1/auth/register", json!({})))
        .await;

    let body = body_json(response).await;

    // Exactly the three envelope keys, no internals
    assert!(body["success"].is_boolean());
    assert!(body["message"].is_string());
    assert!(body["errors"].is_object());
    assert_eq!(body.as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unauthenticated_errors_omit_the_errors_key() {
    let app = TestApp::new();

    let response = app.call(request("GET", "/v1/auth/user")).await;
    let body = body_json(response).await;

    assert_eq!(body["success"], false);
    assert!(body.get("errors").is_none());
}
