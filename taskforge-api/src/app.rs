/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with
/// every route and middleware layer attached.
///
/// # Example
///
/// ```no_run
/// use taskforge_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskforge_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::ApiError,
    middleware::security::SecurityHeadersLayer,
    services::{audit::TracingAuditLog, auth::AuthService, tasks::TaskService},
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskforge_shared::auth::middleware::{authenticate, extract_bearer_token};
use taskforge_shared::repo::{PgAuthRepository, PgTaskRepository};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The
/// services hold `Arc`s internally, so the clone is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Task operations
    pub tasks: TaskService,

    /// Account operations
    pub auth: AuthService,
}

impl AppState {
    /// Creates new application state, wiring services to the pool
    pub fn new(db: PgPool, config: Config) -> Self {
        let config = Arc::new(config);
        let audit = Arc::new(TracingAuditLog::default());
        let task_repo = Arc::new(PgTaskRepository::new(db.clone()));
        let auth_repo = Arc::new(PgAuthRepository::new(db.clone()));

        let tasks = TaskService::new(task_repo, audit.clone());
        let auth = AuthService::new(auth_repo, audit, config.auth.token_ttl_days);

        Self {
            db,
            config,
            tasks,
            auth,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /v1/                          # API v1 (versioned)
///     ├── /auth/
///     │   ├── POST /register        # public
///     │   ├── POST /login           # public
///     │   ├── POST /logout          # bearer token
///     │   └── GET  /user            # bearer token
///     └── /tasks/                   # bearer token throughout
///         ├── GET    /              # list (filter/sort/paginate)
///         ├── POST   /              # create
///         ├── GET    /:id
///         ├── PUT    /:id           # partial update
///         ├── PATCH  /:id           # same handler as PUT
///         ├── DELETE /:id           # soft delete
///         └── PATCH  /:id/toggle    # flip completed/pending
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Bearer authentication (per-route-group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Register and login are reachable without a token
    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Logout and current-user require the token they act on
    let protected_auth_routes = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/user", get(routes::auth::current_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    // Task routes (bearer token required)
    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::index).post(routes::tasks::store),
        )
        .route(
            "/:id",
            get(routes::tasks::show)
                .put(routes::tasks::update)
                .patch(routes::tasks::update)
                .delete(routes::tasks::destroy),
        )
        .route("/:id/toggle", patch(routes::tasks::toggle))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    // Build complete v1 API
    let v1_routes = Router::new()
        .nest("/auth", public_auth_routes.merge(protected_auth_routes))
        .nest("/tasks", task_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Bearer token authentication middleware layer
///
/// Pulls the token from the Authorization header, resolves it to a user,
/// and injects [`CurrentUser`](taskforge_shared::auth::middleware::CurrentUser)
/// into request extensions. Any failure answers 401 with
/// "Unauthenticated." and no further detail.
async fn bearer_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(req.headers())?.to_string();

    let current = authenticate(&state.db, &token).await?;

    req.extensions_mut().insert(current);

    Ok(next.run(req).await)
}
