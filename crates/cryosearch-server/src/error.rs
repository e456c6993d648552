//! API errors and their HTTP mapping.
//!
//! Every error body is `{"error": "<message>"}`.
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Missing, unsafe, badly encoded or invalid input | 400 |
//! | `/search` query too short | 409 |
//! | Unknown article | 404 |
//! | Datastore or internal failure | 500 |

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cryosearch::{ValidationError, error::CryoError};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

const INTERNAL_MESSAGE: &str = "An error occurred while processing your request.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Mapping for the full search endpoint, where a too-short query is a
    /// conflict rather than a bad request.
    pub fn from_search_validation(err: &ValidationError) -> Self {
        match err {
            ValidationError::TooShort { .. } => Self::Conflict(err.to_string()),
            _ => Self::BadRequest(err.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<CryoError> for ApiError {
    fn from(err: CryoError) -> Self {
        match err {
            CryoError::Validation(err) => err.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(_: QueryRejection) -> Self {
        Self::BadRequest(ValidationError::InvalidPage.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Internal(detail) => {
                error!(error = %detail, "Request failed");
                INTERNAL_MESSAGE.to_string()
            }
            other => {
                warn!(status = status.as_u16(), error = %other, "Request rejected");
                other.to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_validation_status() {
        let short = ApiError::from_search_validation(&ValidationError::TooShort { min_len: 3 });
        assert_eq!(short.status(), StatusCode::CONFLICT);

        let unsafe_chars = ApiError::from_search_validation(&ValidationError::InvalidCharacters);
        assert_eq!(unsafe_chars.status(), StatusCode::BAD_REQUEST);
        assert_eq!(unsafe_chars.to_string(), "Invalid characters in query");
    }

    #[test]
    fn test_quick_search_too_short_is_bad_request() {
        let err = ApiError::from(ValidationError::TooShort { min_len: 3 });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = ApiError::Internal("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
