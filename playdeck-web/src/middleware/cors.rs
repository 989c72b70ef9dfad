//! Permissive cross-origin access

use axum::http::{HeaderName, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

/// CORS configuration
///
/// The control plane is served to browser dashboards on arbitrary origins, so
/// the default allows any origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Allowed origins; `["*"]` allows any origin
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    /// Maximum age for preflight cache
    pub max_age: Option<Duration>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["GET", "POST", "PUT", "OPTIONS"]
                .into_iter()
                .map(String::from)
                .collect(),
            allowed_headers: vec!["content-type".to_string()],
            max_age: None,
        }
    }
}

/// Permissive CORS layer with the default configuration
pub fn cors_layer() -> CorsLayer {
    cors_layer_with_config(&CorsConfig::default())
}

/// Create CORS layer from configuration
///
/// Entries that do not parse as header values, methods or header names are
/// skipped.
pub fn cors_layer_with_config(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    let mut layer = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers));

    if let Some(max_age) = config.max_age {
        layer = layer.max_age(max_age);
    }

    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_any_origin_is_allowed() {
        let app = Router::new()
            .route("/tasks", get(|| async { "[]" }))
            .layer(cors_layer());

        let request = Request::builder()
            .uri("/tasks")
            .header(header::ORIGIN, "http://dashboard.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_explicit_origin_list() {
        let config = CorsConfig {
            allowed_origins: vec!["http://ops.internal".to_string()],
            ..Default::default()
        };
        let app = Router::new()
            .route("/tasks", get(|| async { "[]" }))
            .layer(cors_layer_with_config(&config));

        let request = Request::builder()
            .uri("/tasks")
            .header(header::ORIGIN, "http://elsewhere.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
