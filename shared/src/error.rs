//! Unified error taxonomy and API response envelope
//!
//! Component-level functions return [`AppResult`]; the HTTP boundary only
//! converts errors into responses, it never invents new categories.
//!
//! | Variant | HTTP | Retry |
//! |---------|------|-------|
//! | Validation | 400 | never |
//! | NotFound | 404 | never |
//! | Conflict | 409 | never |
//! | PartialFailure | 500 | per-record |
//! | Database | 500 | caller decides |
//! | Internal | 500 | caller decides |

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// One failed record inside a bulk operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureDetail {
    /// Identifier of the record that failed
    pub id: String,
    /// Human-readable reason
    pub reason: String,
}

impl FailureDetail {
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Application error enumeration
#[derive(Debug, Clone, Error)]
pub enum AppError {
    // ========== Client Faults (4xx) ==========
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // ========== Bulk Operations ==========
    /// Some records of a cascading update succeeded, some failed.
    /// Never swallowed: the caller gets the full per-record breakdown.
    #[error("Partial failure: {succeeded} succeeded, {} failed", .failures.len())]
    PartialFailure {
        succeeded: usize,
        failures: Vec<FailureDetail>,
    },

    // ========== System Errors (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error for a named resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(format!("{} not found", resource.into()))
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Aggregate a bulk outcome: `Ok` when nothing failed, otherwise the
    /// full breakdown as a `PartialFailure`.
    pub fn from_bulk(succeeded: usize, failures: Vec<FailureDetail>) -> Result<usize, AppError> {
        if failures.is_empty() {
            Ok(succeeded)
        } else {
            Err(AppError::PartialFailure {
                succeeded,
                failures,
            })
        }
    }

    /// HTTP status for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PartialFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::PartialFailure { .. } => "PARTIAL_FAILURE",
            AppError::Database(_) => "DATABASE",
            AppError::Internal(_) => "INTERNAL",
        }
    }
}

/// Unified API response structure
///
/// ```json
/// { "code": "OK", "message": "OK", "data": { ... } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// "OK" for success, error code otherwise
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Response payload (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Per-record failures (present on partial failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<FailureDetail>>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            code: "OK".to_string(),
            message: "OK".to_string(),
            data: Some(data),
            failures: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        let failures = match err {
            AppError::PartialFailure { failures, .. } => Some(failures.clone()),
            _ => None,
        };
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            data: None,
            failures,
        }
    }
}

/// Result type alias used across all components
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // System errors surface opaque to the caller but never silently
        if matches!(self, AppError::Database(_) | AppError::Internal(_)) {
            error!(code = self.code(), error = %self, "System error occurred");
        }
        let status = self.http_status();
        let body = ApiResponse::<()>::error(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            AppError::validation("bad input").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("Order").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict("already confirmed").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::database("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::not_found("Order");
        assert_eq!(err.to_string(), "Resource not found: Order not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_from_bulk_clean() {
        assert_eq!(AppError::from_bulk(3, vec![]).unwrap(), 3);
    }

    #[test]
    fn test_from_bulk_partial() {
        let failures = vec![FailureDetail::new("order:1", "gone")];
        let err = AppError::from_bulk(2, failures).unwrap_err();
        match &err {
            AppError::PartialFailure {
                succeeded,
                failures,
            } => {
                assert_eq!(*succeeded, 2);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].id, "order:1");
            }
            other => panic!("expected PartialFailure, got {:?}", other),
        }
        assert_eq!(err.to_string(), "Partial failure: 2 succeeded, 1 failed");
    }

    #[test]
    fn test_partial_failure_envelope() {
        let err = AppError::PartialFailure {
            succeeded: 1,
            failures: vec![FailureDetail::new("u2", "use-points not enabled")],
        };
        let body = ApiResponse::<()>::error(&err);
        assert_eq!(body.code, "PARTIAL_FAILURE");
        assert_eq!(body.failures.as_ref().unwrap().len(), 1);
        assert!(body.data.is_none());
    }

    #[test]
    fn test_api_response_serialize() {
        let response = ApiResponse::success(42);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"code\":\"OK\""));
        assert!(json.contains("\"data\":42"));
        assert!(!json.contains("failures"));
    }
}
