/// Common test utilities for integration tests
///
/// These tests exercise the router without a live database: the pool is
/// created lazily against an unreachable address, so anything that would
/// need a query either fails its connection (health reports "degraded")
/// or is rejected before storage is touched (missing tokens, malformed
/// bearer tokens, body validation). Ownership and persistence behavior is
/// covered by the service-level tests against the in-memory repository.

use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use taskforge_api::app::{build_router, AppState};
use taskforge_api::config::{ApiConfig, AuthConfig, Config, DatabaseConfig, PaginationConfig};
use tower::Service as _;

/// Connection string pointing nowhere; port 1 never answers
const UNREACHABLE_DB: &str = "postgresql://localhost:1/taskforge_test";

/// Test application over a lazy, never-connected pool
pub struct TestApp {
    pub app: axum::Router,
}

impl TestApp {
    pub fn new() -> Self {
        let pool = PgPoolOptions::new()
            .connect_lazy(UNREACHABLE_DB)
            .expect("lazy pool should parse url");

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: UNREACHABLE_DB.to_string(),
                max_connections: 1,
            },
            auth: AuthConfig {
                token_ttl_days: None,
            },
            pagination: PaginationConfig { max_per_page: 100 },
        };

        let state = AppState::new(pool, config);

        Self {
            app: build_router(state),
        }
    }

    /// Sends a request through the router
    pub async fn call(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.expect("infallible")
    }
}

/// Builds a bodyless request
pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Builds a bodyless request carrying an Authorization header
pub fn request_with_auth(method: &str, uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", authorization)
        .body(Body::empty())
        .unwrap()
}

/// Builds a JSON request
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Decodes a response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
