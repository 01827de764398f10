// API error responses
use crate::application::error::ServiceError;
use crate::domain::profile::ProfileError;
use crate::domain::quiz::QuizError;
use crate::domain::time_series::SeriesError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Error body returned by every JSON endpoint
#[derive(Debug, Clone, Serialize, Error)]
#[error("{message}")]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    pub fn with_code(status: StatusCode, message: impl Into<String>, code: &str) -> Self {
        Self {
            status,
            message: message.into(),
            code: Some(code.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::UnknownSource(_) => {
                Self::with_code(StatusCode::NOT_FOUND, message, "NOT_FOUND")
            }
            ServiceError::Series(SeriesError::InvalidRange { .. })
            | ServiceError::Series(SeriesError::InvalidWindow { .. }) => {
                Self::with_code(StatusCode::BAD_REQUEST, message, "INVALID_RANGE")
            }
            ServiceError::Profile(_) => {
                Self::with_code(StatusCode::BAD_REQUEST, message, "INVALID_PROFILE")
            }
            ServiceError::Quiz(QuizError::AlreadyCompleted) => {
                Self::with_code(StatusCode::BAD_REQUEST, message, "QUIZ_COMPLETED")
            }
            ServiceError::Quiz(QuizError::InvalidSession(_))
            | ServiceError::Quiz(QuizError::SessionMismatch { .. }) => {
                Self::with_code(StatusCode::BAD_REQUEST, message, "INVALID_SESSION")
            }
            ServiceError::Quiz(QuizError::InvalidOption { .. }) => {
                Self::with_code(StatusCode::BAD_REQUEST, message, "INVALID_ANSWER")
            }
            ServiceError::Series(_) | ServiceError::Export(_) => {
                tracing::error!("Internal error: {}", message);
                Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_ERROR")
            }
        }
    }
}

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        ServiceError::from(err).into()
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        ServiceError::from(err).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::with_code(rejection.status(), rejection.body_text(), "INVALID_QUERY")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::with_code(rejection.status(), rejection.body_text(), "INVALID_BODY")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::UnknownSource("x".to_string()), StatusCode::NOT_FOUND),
            (
                ServiceError::Series(SeriesError::InvalidRange { lo: 2, hi: 1 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Series(SeriesError::InvalidWindow { window: 0 }),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::Quiz(QuizError::AlreadyCompleted), StatusCode::BAD_REQUEST),
            (
                ServiceError::Quiz(QuizError::InvalidSession("score exceeds answered questions")),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Profile(ProfileError::ScoreOutOfRange {
                    field: "waste_score",
                    value: 9,
                    max: 5,
                }),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::Export("disk".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_body_omits_status() {
        let err = ApiError::with_code(StatusCode::NOT_FOUND, "missing", "NOT_FOUND");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "missing", "code": "NOT_FOUND" }));
    }
}
