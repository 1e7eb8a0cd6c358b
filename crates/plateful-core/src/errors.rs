// ABOUTME: Unified error type, error codes, and HTTP error body for the Plateful service
// ABOUTME: Maps planner failures (validation, missing catalog, internal) onto HTTP statuses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! # Unified Error Handling System
//!
//! Centralized error handling for the Plateful service. It defines the error
//! codes, the `AppError` type carried through every fallible operation, and
//! the JSON body returned to HTTP clients:
//!
//! ```json
//! { "error": "missing prompt", "code": "MISSING_REQUIRED_FIELD" }
//! ```
//!
//! `details` is only attached when the caller opted into diagnostics.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// A required request field is missing or blank
    MissingRequiredField = 3001,
    /// The request body could not be decoded
    InvalidFormat = 3002,

    // Resource Management (4000-4999)
    /// The catalog is empty or cannot be read
    DataUnavailable = 4004,

    // External Services (5000-5999)
    /// An external collaborator returned an error
    ExternalServiceError = 5000,
    /// An external collaborator could not be reached
    ExternalServiceUnavailable = 5001,
    /// Authentication with an external collaborator failed
    ExternalAuthFailed = 5002,
    /// An external collaborator rate limited us
    ExternalRateLimited = 5003,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    InternalError = 9000,
    /// Data serialization/deserialization failed
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::MissingRequiredField | Self::InvalidFormat => 400,

            Self::ExternalServiceError | Self::ExternalServiceUnavailable => 502,

            Self::ExternalAuthFailed | Self::ExternalRateLimited => 503,

            // An unusable catalog is a server-side failure, not a transient one
            Self::DataUnavailable | Self::InternalError | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The data format is invalid",
            Self::DataUnavailable => "Catalog data is unavailable",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::InternalError => "An internal server error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message, returned verbatim as the `error` field
    pub message: String,
    /// Optional diagnostic details
    pub details: Option<String>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Attach diagnostic details
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Drop diagnostic details (used when the client did not ask for them)
    #[must_use]
    pub fn without_details(mut self) -> Self {
        self.details = None;
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short message
    pub error: String,
    /// Machine-readable code
    pub code: ErrorCode,
    /// Diagnostics, present only on request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: error.message.clone(),
            code: error.code,
            details: error.details.clone(),
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// A required field is missing
    #[must_use]
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message)
    }

    /// Catalog empty or unreachable
    #[must_use]
    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DataUnavailable, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Authentication with an external service failed
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalAuthFailed, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use super::{AppError, ErrorResponse};
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use http::StatusCode;

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                tracing::error!(code = ?self.code, error = %self.message, "request failed");
            } else {
                tracing::debug!(code = ?self.code, error = %self.message, "request rejected");
            }
            (status, Json(ErrorResponse::from(&self))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::MissingRequiredField.http_status(), 400);
        assert_eq!(ErrorCode::DataUnavailable.http_status(), 500);
        assert_eq!(ErrorCode::InvalidFormat.http_status(), 400);
        assert_eq!(ErrorCode::ExternalServiceError.http_status(), 502);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::missing_field("missing prompt");
        let json = serde_json::to_value(ErrorResponse::from(&error)).unwrap();
        assert_eq!(json["error"], "missing prompt");
        assert_eq!(json["code"], "MISSING_REQUIRED_FIELD");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_details_are_optional() {
        let error = AppError::internal("meal planning failed").with_details("boom");
        assert_eq!(error.details.as_deref(), Some("boom"));
        assert!(error.without_details().details.is_none());
    }
}
