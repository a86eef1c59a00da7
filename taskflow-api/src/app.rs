/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskflow_api::{app::AppState, config::Config};
/// use taskflow_shared::db::pool::create_pool;
/// use taskflow_shared::repository::PgRepository;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::new(Arc::new(PgRepository::new(pool)), config);
/// let app = taskflow_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use std::sync::Arc;
use taskflow_shared::repository::Repository;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Entity repository (owns the connection pool)
    pub repo: Arc<dyn Repository>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(repo: Arc<dyn Repository>, config: Config) -> Self {
        Self {
            repo,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check
/// └── /api/
///     ├── GET    /                     # Service identity
///     ├── /tasks
///     │   ├── POST   /                 # Create task
///     │   ├── GET    /                 # List tasks
///     │   ├── GET    /:id              # Get task
///     │   ├── PUT    /:id              # Update task
///     │   └── DELETE /:id              # Delete task
///     ├── /users
///     │   ├── POST   /                 # Create user
///     │   └── GET    /                 # List users
///     └── /analytics
///         ├── GET /overview
///         ├── GET /tasks-by-status
///         └── GET /tasks-by-priority
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks).post(routes::tasks::create_task))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let user_routes = Router::new()
        .route("/", get(routes::users::list_users).post(routes::users::create_user));

    let analytics_routes = Router::new()
        .route("/overview", get(routes::analytics::overview))
        .route("/tasks-by-status", get(routes::analytics::tasks_by_status))
        .route("/tasks-by-priority", get(routes::analytics::tasks_by_priority));

    let api_routes = Router::new()
        .nest("/tasks", task_routes)
        .nest("/users", user_routes)
        .nest("/analytics", analytics_routes);

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api", get(routes::root::root))
        .route("/api/", get(routes::root::root))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Builds the CORS policy from configuration
///
/// `*` allows any origin, method and header without credentials. An explicit
/// origin list allows credentials and mirrors the requested method and headers.
pub fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
