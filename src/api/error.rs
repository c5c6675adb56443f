use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::services::MovieError;
use crate::validation::ValidationErrors;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(ValidationErrors),

    BadRequest(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => write!(f, "Validation error: {}", errors),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::ValidationError(errors) => {
                (StatusCode::BAD_REQUEST, json!({ "error": errors }))
            }
            ApiError::BadRequest(msg) => {
                tracing::debug!("Rejected request body: {}", msg);
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        match err {
            MovieError::NotFound(_) => ApiError::movie_not_found(),
            MovieError::Validation(errors) => ApiError::ValidationError(errors),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn movie_not_found() -> Self {
        ApiError::NotFound("Movie not found".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MovieId;
    use crate::validation::validate_movie;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_uses_error_key() {
        let err = ApiError::from(MovieError::NotFound(MovieId::new("nope")));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Movie not found" }));
    }

    #[tokio::test]
    async fn test_validation_errors_are_listed() {
        let errors = validate_movie(&json!({})).unwrap_err();
        let (status, body) = render(ApiError::from(MovieError::from(errors))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let fields: Vec<&str> = body["error"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(
            fields,
            vec!["title", "year", "director", "duration", "poster", "genre"]
        );
    }

    #[tokio::test]
    async fn test_bad_request_carries_message() {
        let (status, body) = render(ApiError::BadRequest("broken body".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "broken body");
    }
}
