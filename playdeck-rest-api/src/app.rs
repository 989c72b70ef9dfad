//! Router and middleware assembly

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use playdeck_web::{cors_layer, preflight_middleware, request_id_middleware};
use tower_http::trace::TraceLayer;

use crate::{context::AppContext, handlers};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Enable CORS middleware
    pub enable_cors: bool,
    /// Enable request ID tracking
    pub enable_request_id: bool,
    /// Enable request tracing
    pub enable_tracing: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_request_id: true,
            enable_tracing: true,
        }
    }
}

/// Create the complete REST API application
pub fn create_rest_app(context: AppContext, config: AppConfig) -> Router {
    let app = Router::new()
        .route("/health", get(handlers::health_check))
        .merge(create_api_router())
        .with_state(context);

    // Add middleware layers (the last one added runs first)
    let mut app = app.layer(middleware::from_fn(preflight_middleware));

    if config.enable_cors {
        app = app.layer(cors_layer());
    }

    if config.enable_request_id {
        app = app.layer(middleware::from_fn(request_id_middleware));
    }

    if config.enable_tracing {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

fn create_api_router() -> Router<AppContext> {
    Router::new()
        // Runs
        .route("/run", post(handlers::start_run))
        .route("/tasks", get(handlers::list_runs))
        .route("/tasks/logs", get(handlers::get_run_logs))
        .route("/tasks/stream", get(handlers::stream_run))
        .route("/playbook/check", post(handlers::check_playbook))
        // Hosts
        .route("/hosts", get(handlers::list_hosts))
        .route("/hosts/add", post(handlers::add_host))
        .route("/hosts/health", get(handlers::check_hosts_health))
        // Templates
        .route("/templates", get(handlers::list_templates))
        .route("/templates/add", post(handlers::add_template))
        .route("/templates/update", put(handlers::update_template))
        // Roles and files
        .route("/roles", get(handlers::list_roles))
        .route("/roles/add", post(handlers::add_role))
        .route("/files", get(handlers::list_files))
        .route("/files/add", post(handlers::add_file))
        .route("/files/update", put(handlers::update_file))
        // Notifications
        .route("/notifications", get(handlers::list_notifications))
        .route("/notifications/read", put(handlers::mark_notification_read))
}
