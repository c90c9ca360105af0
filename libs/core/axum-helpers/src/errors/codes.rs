//! Type-safe error codes for API responses.
//!
//! Single source of truth for error codes used across the application.
//! Each code has a string form for clients, an integer for monitoring,
//! and a default human-readable message.

use serde::{Deserialize, Serialize};

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1099)
    /// Request validation failed
    ValidationError,

    /// Invalid UUID format in path or query parameter
    InvalidUuid,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// Authentication credentials are missing or invalid
    Unauthorized,

    /// Authenticated user lacks sufficient permissions
    Forbidden,

    /// Request conflicts with current resource state (e.g. duplicate SKU)
    Conflict,

    /// Request payload is semantically incorrect
    UnprocessableEntity,

    // Server errors (1500-1599)
    /// An unexpected internal server error occurred
    InternalError,

    /// JSON serialization failed server-side
    SerdeJsonError,

    /// I/O error
    IoError,

    /// Service is temporarily unavailable
    ServiceUnavailable,
}

impl ErrorCode {
    /// String representation for client consumption
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidUuid => "INVALID_UUID",
            ErrorCode::JsonExtraction => "JSON_EXTRACTION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::SerdeJsonError => "SERDE_JSON_ERROR",
            ErrorCode::IoError => "IO_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Integer code for logging and monitoring
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidUuid => 1002,
            ErrorCode::JsonExtraction => 1003,
            ErrorCode::NotFound => 1004,
            ErrorCode::Unauthorized => 1005,
            ErrorCode::Forbidden => 1006,
            ErrorCode::Conflict => 1007,
            ErrorCode::UnprocessableEntity => 1008,
            ErrorCode::InternalError => 1500,
            ErrorCode::SerdeJsonError => 1501,
            ErrorCode::IoError => 1502,
            ErrorCode::ServiceUnavailable => 1503,
        }
    }

    /// Default human-readable message
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Request validation failed",
            ErrorCode::InvalidUuid => "Invalid UUID format",
            ErrorCode::JsonExtraction => "Invalid JSON in request body",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::Unauthorized => "Authentication required",
            ErrorCode::Forbidden => "Insufficient permissions",
            ErrorCode::Conflict => "Resource already exists",
            ErrorCode::UnprocessableEntity => "Request payload is semantically incorrect",
            ErrorCode::InternalError => "An internal error occurred",
            ErrorCode::SerdeJsonError => "Failed to serialize response",
            ErrorCode::IoError => "I/O error",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_str_and_int() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(
            ErrorCode::ValidationError.default_message(),
            "Request validation failed"
        );
    }

    #[test]
    fn test_error_code_serde_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
    }
}
