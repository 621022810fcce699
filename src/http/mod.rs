//! HTTP layer: transport, retry policy and error taxonomy.

mod client;
mod error;
mod retry;
mod transport;

pub use client::{HttpClient, RequestOptions};
pub use error::{
    API_ERROR, DEFAULT_ERROR_MESSAGE, ErrorCategory, RATE_LIMIT_ERROR, REQUEST_TOO_LARGE,
    RequestError, UNAUTHORIZED_ERROR, VALIDATION_ERROR,
};
pub use retry::{ErrorBody, RetryPolicy, classify_response};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

#[cfg(test)]
pub use transport::MockTransport;
