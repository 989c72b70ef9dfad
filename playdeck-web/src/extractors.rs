//! Request extractors

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::WebError;

/// JSON request body that rejects anything unparseable with 400
///
/// axum's own `Json` answers 422 for well-formed JSON of the wrong shape and
/// 415 for a missing content type; clients of this API expect a plain 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> WebError {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    WebError::bad_request(format!("Invalid request: {}", rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Payload {
        id: u64,
    }

    async fn handler(JsonBody(payload): JsonBody<Payload>) -> String {
        payload.id.to_string()
    }

    async fn send(body: &str, content_type: Option<&str>) -> StatusCode {
        let mut builder = HttpRequest::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        let app = Router::new().route("/", post(handler));
        app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_valid_body() {
        assert_eq!(send(r#"{"id": 3}"#, Some("application/json")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejections_are_bad_request() {
        assert_eq!(send("{not json", Some("application/json")).await, StatusCode::BAD_REQUEST);
        assert_eq!(send(r#"{"id": "x"}"#, Some("application/json")).await, StatusCode::BAD_REQUEST);
        assert_eq!(send(r#"{"id": 3}"#, None).await, StatusCode::BAD_REQUEST);
    }
}
