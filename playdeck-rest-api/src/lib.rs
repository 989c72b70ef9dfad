//! # Playdeck REST API
//!
//! HTTP surface of the Playdeck control plane. Handlers are thin: they parse
//! the request, call into the registries and the execution pipeline, and map
//! failures through [`RestError`].
//!
//! ## Endpoints
//!
//! - **Runs**: `POST /run` (server-sent events), `GET /tasks`,
//!   `GET /tasks/logs?task_id=`, `GET /tasks/stream?task_id=`,
//!   `POST /playbook/check`
//! - **Hosts**: `GET /hosts`, `POST /hosts/add`, `GET /hosts/health`
//! - **Templates**: `GET /templates[?type=]`, `POST /templates/add`,
//!   `PUT /templates/update`
//! - **Catalog**: `GET /roles`, `POST /roles/add`, `GET /files[?type=]`,
//!   `POST /files/add`, `PUT /files/update`
//! - **Notifications**: `GET /notifications`, `PUT /notifications/read`
//! - **Service**: `GET /health`
//!
//! Every endpoint allows cross-origin requests and answers `OPTIONS` with an
//! empty 200.
//!
//! ## Example
//!
//! ```rust,no_run
//! use playdeck_rest_api::{create_rest_app, AppConfig, AppContext};
//!
//! # async fn example(context: AppContext) -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_rest_app(context, AppConfig::default());
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod context;
pub mod errors;
pub mod handlers;

// Re-export commonly used types
pub use app::{create_rest_app, AppConfig};
pub use context::{AppContext, CatalogContext, HostsContext, NotificationsContext, RunsContext};
pub use errors::{RestError, RestResult};
