//! Mapping of permission errors to HTTP responses.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::PermissionError;

/// Message returned for faults; details stay in the logs.
const GENERIC_FAULT_MESSAGE: &str = "an error occurred while checking permissions";

/// The JSON body returned when a request is rejected.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use ownership_guard::web::ErrorResponse;
/// use ownership_guard::{PermissionError, Violation, ViolationKind};
///
/// let err = PermissionError::from(Violation::new(ViolationKind::OwnershipMismatch, "not yours"));
/// let (status, body) = ErrorResponse::from_error(&err);
///
/// assert_eq!(status, StatusCode::FORBIDDEN);
/// assert_eq!(body.code, "403");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status code as text (`"403"`, `"400"` or `"500"`)
    pub code: String,
    /// Human-readable reason
    pub message: String,
}

impl ErrorResponse {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16().to_string(),
            message: message.into(),
        }
    }

    /// Maps an error to its status and body, logging it at the matching level.
    ///
    /// Denials are 403 and configuration errors are 400, both with the error
    /// text. Unexpected failures are 500 with a generic message; the cause is
    /// only logged.
    pub fn from_error(err: &PermissionError) -> (StatusCode, Self) {
        match err {
            PermissionError::AccessDenied(violation) => {
                tracing::warn!(kind = %violation.kind, "access denied: {}", violation.message);
                let status = StatusCode::FORBIDDEN;
                (status, Self::new(status, violation.to_string()))
            }
            PermissionError::Configuration(config) => {
                tracing::error!(error = %config, "permission configuration error");
                let status = StatusCode::BAD_REQUEST;
                (status, Self::new(status, config.to_string()))
            }
            PermissionError::Unexpected { context, source } => {
                tracing::error!(error = %source, "unexpected failure while {}", context);
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, Self::new(status, GENERIC_FAULT_MESSAGE))
            }
        }
    }

    /// Builds a complete JSON response for an error.
    pub fn http_response(err: &PermissionError) -> http::Response<Bytes> {
        let (status, body) = Self::from_error(err);
        let payload = serde_json::to_vec(&body).unwrap_or_default();

        let mut response = http::Response::new(Bytes::from(payload));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}
