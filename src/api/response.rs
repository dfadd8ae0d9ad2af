//! Response types for the rotation API.
//!
//! This module defines the error response structures and the mapping from
//! [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::EmployeeSnapshotRecord;

/// Body of `GET /rotation/personnel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonnelListing {
    /// The snapshot reference date.
    pub reference_date: NaiveDate,
    /// Number of workers returned.
    pub count: usize,
    /// The workers in the snapshot after filtering.
    pub personnel: Vec<EmployeeSnapshotRecord>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates an error for a query string that could not be parsed.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new("INVALID_QUERY", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_PERIOD",
                    message,
                    "Month must be between 1 and 12",
                ),
            ),
            EngineError::YearOutOfRange { min, max, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "YEAR_OUT_OF_RANGE",
                    message,
                    format!("Reports are available for {} through {}", min, max),
                ),
            ),
            EngineError::Unauthorized { .. } => (
                StatusCode::UNAUTHORIZED,
                ApiError::with_details(
                    "UNAUTHORIZED",
                    "Not authorized to read the HR source",
                    message,
                ),
            ),
            EngineError::FetchFailed { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::with_details("FETCH_FAILED", "Could not obtain snapshot", message),
            ),
            EngineError::FetchTimeout { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::with_details("FETCH_TIMEOUT", "HR source did not answer in time", message),
            ),
            EngineError::MalformedPayload { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::with_details(
                    "MALFORMED_PAYLOAD",
                    "HR source returned an unreadable response",
                    message,
                ),
            ),
        };

        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_invalid_period_maps_to_400() {
        let response: ApiErrorResponse = EngineError::InvalidPeriod {
            year: 2025,
            month: 13,
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_PERIOD");
        assert!(response.error.message.contains("month 13"));
    }

    #[test]
    fn test_year_out_of_range_maps_to_400() {
        let response: ApiErrorResponse = EngineError::YearOutOfRange {
            year: 2019,
            min: 2020,
            max: 2030,
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.error.details.as_deref(),
            Some("Reports are available for 2020 through 2030")
        );
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response: ApiErrorResponse = EngineError::Unauthorized {
            message: "HTTP 403".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.error.code, "UNAUTHORIZED");
    }

    #[test]
    fn test_fetch_errors_map_to_502() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let errors = [
            EngineError::FetchFailed {
                reference_date: date,
                message: "HTTP 500".to_string(),
            },
            EngineError::FetchTimeout {
                reference_date: date,
                timeout_ms: 30_000,
            },
            EngineError::MalformedPayload {
                message: "expected value".to_string(),
            },
        ];
        for error in errors {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn test_config_errors_map_to_500() {
        let response: ApiErrorResponse = EngineError::InvalidConfig {
            message: "concurrency_limit must be at least 1".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "CONFIG_ERROR");
    }
}
