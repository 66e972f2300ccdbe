//! Error taxonomy surfaced by the weather routes.
//!
//! Every variant is reported synchronously as a JSON `{"error": ...}` body;
//! none of them is fatal to the process.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::models::ErrorResponse;
use crate::services::{location::ResolutionError, provider::ProviderError};

/// Errors returned by the weather query service and its handlers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Missing or unparseable input (400)
    #[error("{0}")]
    Validation(String),

    /// Referenced attraction or cached row does not exist (404)
    #[error("{0}")]
    NotFound(String),

    /// The external weather provider failed (503)
    #[error("{0}")]
    Provider(String),

    /// Caller exceeded the per-client request budget (429)
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// The application was wired without a required component (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<ResolutionError> for ApiError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::NotFound { .. } => Self::NotFound(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Provider(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
