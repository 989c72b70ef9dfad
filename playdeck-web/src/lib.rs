//! # Playdeck Web Utilities
//!
//! Reusable axum plumbing for the Playdeck HTTP API.
//!
//! - **Errors**: [`WebError`] with a uniform JSON error body
//! - **Middleware**: permissive CORS, request IDs, OPTIONS short-circuit
//! - **Extractors**: [`JsonBody`], which rejects malformed JSON with 400
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::post, Router};
//! use playdeck_web::{cors_layer, preflight_middleware, request_id_middleware, JsonBody};
//!
//! async fn echo(JsonBody(body): JsonBody<serde_json::Value>) -> String {
//!     body.to_string()
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let app: Router = Router::new()
//!     .route("/echo", post(echo))
//!     .layer(middleware::from_fn(preflight_middleware))
//!     .layer(cors_layer())
//!     .layer(middleware::from_fn(request_id_middleware));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

pub mod errors;
pub mod extractors;
pub mod middleware;

// Re-export commonly used types and functions
pub use errors::{WebError, WebResult};
pub use extractors::JsonBody;
pub use middleware::{
    cors_layer, cors_layer_with_config, preflight_middleware, request_id_middleware, CorsConfig,
    REQUEST_ID_HEADER,
};
