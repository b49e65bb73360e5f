//! Request extraction with required-field checks.
//!
//! A field is "required" in the API sense: it must be present, and neither an
//! empty string nor an integer zero. Any failure (malformed JSON, wrong
//! content type, wrong field type, missing or blank field) is answered with
//! 400 `{"error": "Invalid input"}`. Query strings that do not deserialize
//! get the same answer.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, INVALID_INPUT};

/// Payloads whose fields are all required.
pub trait RequiredFields {
    /// Whether every field carries a usable value.
    fn has_required_fields(&self) -> bool;
}

/// Whether a string field counts as present.
pub const fn present(value: &str) -> bool {
    !value.is_empty()
}

/// Whether an integer field counts as present.
pub fn nonzero(value: impl Into<i32>) -> bool {
    value.into() != 0
}

/// JSON body extractor that enforces [`RequiredFields`].
///
/// # Example
///
/// ```rust,ignore
/// async fn login(ApiJson(request): ApiJson<LoginRequest>) -> Result<Json<Value>> {
///     // request.email and request.password are non-empty here
/// }
/// ```
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + RequiredFields + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "Rejected request body");
                AppError::BadRequest(INVALID_INPUT.to_string())
            })?;

        if !payload.has_required_fields() {
            tracing::debug!("Request body has blank required fields");
            return Err(AppError::BadRequest(INVALID_INPUT.to_string()));
        }

        Ok(Self(payload))
    }
}

/// Query string extractor whose rejections are JSON [`AppError`]s.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "Rejected query string");
                AppError::BadRequest(INVALID_INPUT.to_string())
            })?;

        Ok(Self(query))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::StatusCode,
        routing::{get, post},
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Deserialize)]
    struct Payload {
        name: String,
        count: i32,
    }

    impl RequiredFields for Payload {
        fn has_required_fields(&self) -> bool {
            present(&self.name) && nonzero(self.count)
        }
    }

    async fn status_for(body: &str, content_type: &str) -> StatusCode {
        let app = Router::new().route(
            "/",
            post(|ApiJson(p): ApiJson<Payload>| async move { format!("{}:{}", p.name, p.count) }),
        );

        app.oneshot(
            axum::http::Request::post("/")
                .header("content-type", content_type)
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_accepts_complete_payload() {
        let status = status_for(r#"{"name":"mug","count":-2}"#, "application/json").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_blank_or_missing_fields() {
        for body in [
            r#"{"name":"","count":1}"#,
            r#"{"name":"mug","count":0}"#,
            r#"{"name":"mug"}"#,
            r#"{"name":"mug","count":"1"}"#,
            "not json",
        ] {
            assert_eq!(
                status_for(body, "application/json").await,
                StatusCode::BAD_REQUEST,
                "body {body}"
            );
        }
    }

    #[tokio::test]
    async fn test_rejects_wrong_content_type() {
        let status = status_for(r#"{"name":"mug","count":1}"#, "text/plain").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[derive(Deserialize)]
    struct Filter {
        #[serde(default)]
        tag: String,
    }

    #[tokio::test]
    async fn test_query_rejection_is_json() {
        let app = Router::new().route(
            "/",
            get(|ApiQuery(f): ApiQuery<Filter>| async move { f.tag }),
        );

        let response = app
            .oneshot(
                axum::http::Request::get("/?tag=a&tag=b")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["content-type"], "application/json");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"error":"Invalid input"}"#);
    }
}
