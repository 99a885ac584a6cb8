use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::errors::ServiceError;

/// JSON body extractor whose failures surface as `ServiceError::ValidationError`,
/// so malformed bodies share the error body of every other 400.
///
/// An empty body is read as `{}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            ServiceError::ValidationError(format!("Failed to read request body: {}", e))
        })?;

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(body)
            .map(ValidJson)
            .map_err(|e| ServiceError::ValidationError(format!("Invalid JSON body: {}", e)))
    }
}

/// Path extractor whose failures surface as `ServiceError::ValidationError`,
/// e.g. `/service-orders/abc` or an id that overflows `i32`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| ValidPath(value))
            .map_err(|e| {
                ServiceError::ValidationError(format!("Invalid path parameter: {}", e.body_text()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        start_time: Option<String>,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("PUT")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn empty_body_is_an_empty_object() {
        let ValidJson(probe) = ValidJson::<Probe>::from_request(request(""), &())
            .await
            .unwrap();
        assert!(probe.start_time.is_none());
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let result = ValidJson::<Probe>::from_request(request("{\"start_time\": 5}"), &()).await;
        assert_matches!(result, Err(ServiceError::ValidationError(msg)) if msg.starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn unparsable_path_is_a_validation_error() {
        use axum::{http::StatusCode, routing::get, Router};
        use tower::ServiceExt;

        async fn show(ValidPath(id): ValidPath<i32>) -> String {
            id.to_string()
        }

        let app = Router::new().route("/orders/:id", get(show));
        for (uri, expected) in [
            ("/orders/41", StatusCode::OK),
            ("/orders/abc", StatusCode::BAD_REQUEST),
            ("/orders/99999999999", StatusCode::BAD_REQUEST),
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "{}", uri);
        }
    }
}
