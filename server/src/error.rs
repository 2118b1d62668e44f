//! Error codes shared by every layer that can fail a request.

use serde::Serialize;

/// Maps an error to a stable, machine-readable code.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON body returned for every failed API request.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    pub retryable: bool,
}

impl ErrorBody {
    #[must_use]
    pub fn from_error(err: &impl ErrorCode) -> Self {
        Self { error: err.to_string(), code: err.error_code(), retryable: err.retryable() }
    }
}
