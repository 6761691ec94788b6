use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use contentgen_common::ContentGenError;
use contentgen_llm::CategorizedError;

use crate::types::ErrorResponse;

/// Error returned from route handlers.
///
/// Carries only a status and a user-facing message; internal detail is
/// logged where the error is produced and never serialized.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Map a generation failure; `fallback` is the route's generic message
    pub fn from_category(err: CategorizedError, fallback: &str) -> Self {
        err.into_app_error(fallback).into()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ContentGenError> for ApiError {
    fn from(err: ContentGenError) -> Self {
        Self::new(
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            err.public_message(),
        )
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorResponse {
            error: self.message.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        let err = ApiError::from_category(CategorizedError::InvalidCredentials, "fallback");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err = ApiError::from_category(CategorizedError::NetworkFailure, "fallback");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::from_category(
            CategorizedError::Unknown("upstream said 418".to_string()),
            "Failed to generate summary. Please try again.",
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Failed to generate summary. Please try again.");
    }

    #[test]
    fn test_app_error_mapping() {
        let err: ApiError = ContentGenError::config("Google API key is not configured").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Google API key is not configured");

        let err: ApiError = ContentGenError::invalid_input("Content is required").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
