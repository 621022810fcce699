//! Error taxonomy surfaced to callers of the request client.

use std::fmt;

pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred. Please try again.";
pub const API_ERROR: &str = "API error. Please try again later.";
pub const UNAUTHORIZED_ERROR: &str = "Unauthorized. Please check your API key.";
pub const REQUEST_TOO_LARGE: &str = "Request too large. Please reduce the size of your message.";
pub const RATE_LIMIT_ERROR: &str = "Too many requests. Please wait a moment before trying again.";
pub const VALIDATION_ERROR: &str = "Invalid input. Please check your message and try again.";

/// Stable, user-meaningful classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Unauthorized,
    PayloadTooLarge,
    RateLimited,
    ValidationFailed,
    GenericServiceError,
    NetworkFailure,
}

/// Terminal failure of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// HTTP 401
    Unauthorized,
    /// HTTP 413
    PayloadTooLarge,
    /// HTTP 429
    RateLimited,
    /// HTTP 422
    ValidationFailed,
    /// Any other non-2xx status, with the server's `detail` when it sent one.
    Service { status: u16, detail: Option<String> },
    /// No HTTP status was obtained (DNS, connect, timeout).
    Network(String),
    /// A 2xx response whose body could not be decoded into an answer.
    Malformed(String),
}

impl RequestError {
    /// The category this failure belongs to. `Malformed` is uncategorized.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            RequestError::Unauthorized => Some(ErrorCategory::Unauthorized),
            RequestError::PayloadTooLarge => Some(ErrorCategory::PayloadTooLarge),
            RequestError::RateLimited => Some(ErrorCategory::RateLimited),
            RequestError::ValidationFailed => Some(ErrorCategory::ValidationFailed),
            RequestError::Service { .. } => Some(ErrorCategory::GenericServiceError),
            RequestError::Network(_) => Some(ErrorCategory::NetworkFailure),
            RequestError::Malformed(_) => None,
        }
    }

    /// The message a caller should show to the user.
    pub fn user_message(&self) -> &str {
        match self {
            RequestError::Unauthorized => UNAUTHORIZED_ERROR,
            RequestError::PayloadTooLarge => REQUEST_TOO_LARGE,
            RequestError::RateLimited => RATE_LIMIT_ERROR,
            RequestError::ValidationFailed => VALIDATION_ERROR,
            RequestError::Service {
                detail: Some(detail),
                ..
            } => detail.as_str(),
            RequestError::Service { detail: None, .. } => API_ERROR,
            RequestError::Network(_) | RequestError::Malformed(_) => DEFAULT_ERROR_MESSAGE,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

impl std::error::Error for RequestError {}
