//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Absent, negative, or past-the-end `time_pos` query. Kept distinct so
    /// the wire body matches the fixed error string clients key on.
    #[error("Invalid time position")]
    InvalidTimePosition,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Vision error: {0}")]
    Vision(#[from] footfall_vision::VisionError),

    #[error("Timeline error: {0}")]
    Timeline(footfall_timeline::TimelineError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidTimePosition => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Timeline(footfall_timeline::TimelineError::OutOfRange { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Timeline(footfall_timeline::TimelineError::SessionNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Internal(_)
            | ApiError::Vision(_)
            | ApiError::Timeline(footfall_timeline::TimelineError::LockPoisoned) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<footfall_timeline::TimelineError> for ApiError {
    fn from(e: footfall_timeline::TimelineError) -> Self {
        match e {
            // Point queries with a bad index use the fixed reference body.
            footfall_timeline::TimelineError::OutOfRange { .. } => ApiError::InvalidTimePosition,
            other => ApiError::Timeline(other),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let error = match &self {
            ApiError::Internal(_) | ApiError::Vision(_) | ApiError::Timeline(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production"
                    && status == StatusCode::INTERNAL_SERVER_ERROR
                {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_time_position_message() {
        // The body clients key on: {"error": "Invalid time position"}
        assert_eq!(ApiError::InvalidTimePosition.to_string(), "Invalid time position");
        assert_eq!(ApiError::InvalidTimePosition.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_out_of_range_maps_to_invalid_time_position() {
        let err: ApiError =
            footfall_timeline::TimelineError::OutOfRange { index: 5, len: 3 }.into();
        assert!(matches!(err, ApiError::InvalidTimePosition));
    }

    #[test]
    fn test_unknown_session_is_404() {
        let err: ApiError = footfall_timeline::TimelineError::SessionNotFound(
            footfall_models::SessionId::from_string("x"),
        )
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
