//! OPTIONS short-circuit for CORS preflight requests

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Answer every `OPTIONS` request with an empty 200
///
/// Install inside the CORS layer so the CORS headers are still attached.
/// Routes never see `OPTIONS`, including ones that do not exist.
pub async fn preflight_middleware(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::cors_layer;
    use axum::http::header;
    use axum::{middleware, routing::post, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/run", post(|| async { "started" }))
            .layer(middleware::from_fn(preflight_middleware))
            .layer(cors_layer())
    }

    #[tokio::test]
    async fn test_options_returns_empty_ok() {
        for uri in ["/run", "/does-not-exist"] {
            let request = Request::builder()
                .method(Method::OPTIONS)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(bytes.is_empty());
        }
    }

    #[tokio::test]
    async fn test_preflight_keeps_cors_headers() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/run")
            .header(header::ORIGIN, "http://dashboard.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_other_methods_pass_through() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/run")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
