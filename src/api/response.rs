//! Response types for the bulletin engine API.
//!
//! This module defines the error response structures and the mapping from
//! engine errors to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

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

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            EngineError::StorageError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
            EngineError::InvalidRange { .. } => (StatusCode::BAD_REQUEST, "INVALID_RANGE"),
            EngineError::InvalidPeriod { .. } => (StatusCode::BAD_REQUEST, "INVALID_PERIOD"),
            EngineError::MissingPayProfile { .. } => {
                (StatusCode::BAD_REQUEST, "MISSING_PAY_PROFILE")
            }
            EngineError::MissingUnitPrice { .. } => {
                (StatusCode::BAD_REQUEST, "MISSING_UNIT_PRICE")
            }
            EngineError::AmountOverflow { .. } => (StatusCode::BAD_REQUEST, "AMOUNT_OVERFLOW"),
            EngineError::IndeterminateProjection { .. } => {
                (StatusCode::BAD_REQUEST, "INDETERMINATE_PROJECTION")
            }
            EngineError::BulletinNotFound(_) => (StatusCode::NOT_FOUND, "BULLETIN_NOT_FOUND"),
            EngineError::NoSourceReports { .. } => (StatusCode::NOT_FOUND, "NO_SOURCE_REPORTS"),
            EngineError::InvalidStateTransition { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            EngineError::InconsistentSnapshot { .. } => {
                (StatusCode::CONFLICT, "INCONSISTENT_SNAPSHOT")
            }
        };

        Self {
            status,
            error: ApiError::new(code, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BulletinStatus;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(EngineError, StatusCode, &str)> = vec![
            (
                EngineError::MissingPayProfile {
                    employee_ref: "emp_404".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "MISSING_PAY_PROFILE",
            ),
            (
                EngineError::BulletinNotFound(Uuid::nil()),
                StatusCode::NOT_FOUND,
                "BULLETIN_NOT_FOUND",
            ),
            (
                EngineError::InvalidStateTransition {
                    from: BulletinStatus::Draft,
                    to: BulletinStatus::Invoiced,
                },
                StatusCode::CONFLICT,
                "INVALID_STATE_TRANSITION",
            ),
            (
                EngineError::InconsistentSnapshot {
                    report_id: "rdo-1".to_string(),
                    read: 1,
                    current: "2".to_string(),
                },
                StatusCode::CONFLICT,
                "INCONSISTENT_SNAPSHOT",
            ),
            (
                EngineError::InvalidPeriod {
                    start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                    end_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                },
                StatusCode::BAD_REQUEST,
                "INVALID_PERIOD",
            ),
            (
                EngineError::AmountOverflow {
                    context: "equipment 'Crane 50t'".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "AMOUNT_OVERFLOW",
            ),
            (
                EngineError::StorageError {
                    message: "disk full".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
            ),
        ];

        for (engine_error, status, code) in cases {
            let response: ApiErrorResponse = engine_error.into();
            assert_eq!(response.status, status, "status for {}", code);
            assert_eq!(response.error.code, code);
        }
    }

    #[test]
    fn test_message_comes_from_engine_error() {
        let response: ApiErrorResponse = EngineError::BulletinNotFound(Uuid::nil()).into();
        assert_eq!(
            response.error.message,
            format!("Bulletin {} not found", Uuid::nil())
        );
    }
}
