//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nutrition_planner_shared::types::{ErrorDetail, ErrorResponse};
use nutrition_planner_shared::validation::{get_field_display_label, ValidationError};
use nutrition_planner_shared::{ProfileError, SnapshotError};
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Required profile fields are missing (user-facing labels)
    #[error("Profile incomplete: missing {}", .0.join(", "))]
    Incomplete(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::InvalidField { field, message } => {
                ApiError::InvalidField { field, message }
            }
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidField {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors
            .field_errors()
            .into_keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        match fields.as_slice() {
            [field] => ApiError::InvalidField {
                field: field.clone(),
                message: "value out of range".to_string(),
            },
            _ => ApiError::Validation(format!("Out of range: {}", fields.join(", "))),
        }
    }
}

impl From<SnapshotError> for ApiError {
    fn from(err: SnapshotError) -> Self {
        ApiError::Internal(anyhow::Error::new(err).context("stored targets are unreadable"))
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

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut field = None;
        let mut details = None;
        let (status, code, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            ApiError::InvalidField {
                field: name,
                message,
            } => {
                let msg = format!("{}: {}", get_field_display_label(&name), message);
                field = Some(name);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Incomplete(missing) => {
                let msg = format!("Please complete: {}", missing.join(", "));
                details = Some(serde_json::json!({ "missingFields": missing }));
                (StatusCode::UNPROCESSABLE_ENTITY, "PROFILE_INCOMPLETE", msg)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
                details,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[rstest]
    #[case(ApiError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::BadRequest("Malformed JSON".to_string()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::NotFound("Profile not found".to_string()), StatusCode::NOT_FOUND)]
    #[case(ApiError::Incomplete(vec![]), StatusCode::UNPROCESSABLE_ENTITY)]
    fn test_error_status(#[case] error: ApiError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[tokio::test]
    async fn test_incomplete_lists_missing_fields() {
        let error = ApiError::Incomplete(vec!["Gender".to_string(), "Goal".to_string()]);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "PROFILE_INCOMPLETE");
        assert_eq!(body["error"]["details"]["missingFields"][1], "Goal");
    }

    #[tokio::test]
    async fn test_invalid_field_carries_field_name() {
        let error: ApiError = ValidationError::new("height_cm", "Height must be at least 50 cm").into();
        let body = body_json(error.into_response()).await;
        assert_eq!(body["error"]["field"], "height_cm");
        assert_eq!(body["error"]["message"], "Height: Height must be at least 50 cm");
    }

    #[test]
    fn test_unknown_vocabulary_is_validation_error() {
        let error: ApiError = ProfileError::UnknownValue {
            kind: "medication",
            value: "Aspirin".to_string(),
        }
        .into();
        assert!(matches!(error, ApiError::Validation(_)));
    }

    #[test]
    fn test_internal_error_status() {
        let error: ApiError = SnapshotError::MissingField("bmrKcal".to_string()).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
