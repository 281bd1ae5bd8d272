//! Domain-level error type.
//!
//! Errors are transport agnostic: every failure carries a stable
//! [`ErrorCode`] and a [`ValidationReport`] body that inbound adapters render
//! as-is. Messages placed in the report are client facing; adapter fault
//! details belong in logs, never in an `Error`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::TraceId;
use crate::domain::validation::ValidationReport;

/// Header carrying the request trace identifier on responses.
pub const TRACE_ID_HEADER: &str = "Trace-Id";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// No valid bearer token was presented.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request named something the service refuses to touch.
    ServiceUnavailable,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InternalError => "internal_error",
        }
    }
}

/// Domain error: a code plus the report returned to the caller.
///
/// # Examples
/// ```
/// use warden::domain::{Error, ErrorCode};
///
/// let err = Error::forbidden();
/// assert_eq!(err.code(), ErrorCode::Forbidden);
/// assert_eq!(err.report().messages("__error__"), vec!["forbidden"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    report: ValidationReport,
    trace_id: Option<String>,
}

impl Error {
    /// Create an error with the current trace identifier, if one is in scope.
    pub fn new(code: ErrorCode, report: ValidationReport) -> Self {
        Self {
            code,
            report,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Replace the captured trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Aggregated validation failures.
    pub fn invalid_request(report: ValidationReport) -> Self {
        Self::new(ErrorCode::InvalidRequest, report)
    }

    /// Missing or invalid bearer token. Deliberately carries no detail.
    pub fn forbidden() -> Self {
        Self::new(ErrorCode::Forbidden, ValidationReport::request_error("forbidden"))
    }

    /// Rejected resource name. Deliberately carries no detail.
    pub fn unavailable() -> Self {
        Self::new(
            ErrorCode::ServiceUnavailable,
            ValidationReport::request_error("unavailable"),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, ValidationReport::request_error(message))
    }

    /// Unexpected failure; `message` must be safe to show to clients.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalError,
            ValidationReport::request_error(message),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.report)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;
