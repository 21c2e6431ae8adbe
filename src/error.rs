//! Error codes shared by the transport and the typed client.
//!
//! DESIGN
//! ======
//! Transport faults and tool faults are real errors and propagate through
//! `Result`. Every such error carries a grepable code and a retryable flag so
//! callers can decide whether re-issuing the same request makes sense. A reply
//! that cannot be parsed into the requested shape is NOT an error; it is a
//! `TangibleResponse::Failure` value.

use serde::Serialize;

/// Grepable error code and retryable flag for structured error reports.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Serializable snapshot of an error, suitable for printing as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl ErrorReport {
    #[must_use]
    pub fn from_error(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self { code: err.error_code(), message: err.to_string(), retryable: err.retryable() }
    }
}
