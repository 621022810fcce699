//! HTTP client with built-in retry logic and error classification.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use super::error::RequestError;
use super::retry::{RetryPolicy, classify_response};
use super::transport::{HttpRequest, HttpResponse, Transport};
use crate::config::Config;

/// Per-call request options. Headers here override the client defaults.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// A POST carrying `body` serialized as JSON.
    pub fn post_json<T: serde::Serialize + ?Sized>(body: &T) -> Result<Self> {
        let body = serde_json::to_vec(body).context("Failed to serialize request body")?;
        Ok(Self {
            method: Method::POST,
            headers: HeaderMap::new(),
            body: Some(body),
        })
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// HTTP client with built-in retry logic for calls to the answer service.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    config: Arc<Config>,
    default_headers: HeaderMap,
    policy: RetryPolicy,
}

impl HttpClient {
    /// Creates a client sending through `transport`.
    ///
    /// Fails when the configured credential header name or value is not a
    /// valid HTTP header.
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let name = HeaderName::from_bytes(config.api_key_header.as_bytes())
            .with_context(|| format!("Invalid API key header name: {:?}", config.api_key_header))?;
        let mut value =
            HeaderValue::from_str(&config.api_key).context("Invalid API key header value")?;
        value.set_sensitive(true);
        default_headers.insert(name, value);

        debug!(
            "HTTP client configured for {} with credential header {}",
            config.base_url, config.api_key_header
        );

        Ok(Self {
            transport,
            policy: RetryPolicy::from_config(&config),
            config: Arc::new(config),
            default_headers,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Sends a request to `path`, retrying every failure with a fixed delay.
    ///
    /// Retry wraps the whole attempt, so classified status failures (401,
    /// 429, ...) are retried exactly like transport failures before the
    /// last one is returned.
    #[tracing::instrument(skip(self, options), fields(method = %options.method))]
    pub async fn fetch_with_retry(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<HttpResponse, RequestError> {
        let url = self.config.endpoint(path);
        let max_attempts = self.policy.max_attempts();

        let mut attempt = 1;
        loop {
            match self.fetch_once(&url, options).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < max_attempts => {
                    warn!(
                        "{} {}: attempt {}/{} failed ({:?}), retrying in {:?}...",
                        options.method, url, attempt, max_attempts, e, self.policy.delay
                    );
                    tokio::time::sleep(self.policy.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!(
                        "{} {}: giving up after {} attempts: {:?}",
                        options.method, url, attempt, e
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Single attempt without retry.
    async fn fetch_once(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<HttpResponse, RequestError> {
        let request = HttpRequest {
            method: options.method.clone(),
            url: url.to_string(),
            headers: self.merge_headers(&options.headers),
            body: options.body.clone(),
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| RequestError::Network(format!("{:#}", e)))?;

        if !response.is_success() {
            return Err(classify_response(&response));
        }

        Ok(response)
    }

    fn merge_headers(&self, overrides: &HeaderMap) -> HeaderMap {
        let mut headers = self.default_headers.clone();
        for (name, value) in overrides {
            headers.insert(name.clone(), value.clone());
        }
        headers
    }
}
