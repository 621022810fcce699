//! Retry policy and classification of failed responses.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use super::error::RequestError;
use super::transport::HttpResponse;
use crate::config::Config;

/// Fixed-delay, bounded retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one.
    pub max_retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_retries, config.retry_delay)
    }

    /// Total number of attempts a call may make.
    pub fn max_attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }
}

/// Best-effort shape of an error body sent by the service.
///
/// `detail` is kept as raw JSON because some failures carry an object there.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Parses the body, or synthesizes one from the status reason phrase.
    pub fn parse(response: &HttpResponse) -> Self {
        serde_json::from_slice(&response.body).unwrap_or_else(|_| Self {
            error: Some("Unknown error".to_string()),
            detail: Some(serde_json::Value::String(response.status_text().to_string())),
        })
    }

    /// The detail as a displayable string, when it is a non-empty string.
    pub fn detail_text(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

/// Maps a non-2xx response to its error category.
pub fn classify_response(response: &HttpResponse) -> RequestError {
    let body = ErrorBody::parse(response);

    match response.status {
        StatusCode::UNAUTHORIZED => RequestError::Unauthorized,
        StatusCode::PAYLOAD_TOO_LARGE => RequestError::PayloadTooLarge,
        StatusCode::TOO_MANY_REQUESTS => RequestError::RateLimited,
        StatusCode::UNPROCESSABLE_ENTITY => RequestError::ValidationFailed,
        status => RequestError::Service {
            status: status.as_u16(),
            detail: body.detail_text(),
        },
    }
}
