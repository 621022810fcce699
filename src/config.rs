//! Client configuration loaded once from the environment.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;

use crate::runtime::Runtime;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";
pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_MAX_QUESTION_LENGTH: usize = 500;

pub const ENV_BASE_URL: &str = "ASK_API_BASE_URL";
pub const ENV_API_KEY: &str = "ASK_API_KEY";
pub const ENV_API_KEY_HEADER: &str = "ASK_API_KEY_HEADER";
pub const ENV_MAX_RETRIES: &str = "ASK_MAX_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "ASK_RETRY_DELAY_MS";
pub const ENV_MAX_QUESTION_LENGTH: &str = "ASK_MAX_QUESTION_LENGTH";

/// Immutable settings shared by every request a client issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Service root, without a trailing slash.
    pub base_url: String,
    pub api_key: String,
    pub api_key_header: String,
    /// Additional attempts after the first one.
    pub max_retries: usize,
    pub retry_delay: Duration,
    /// Advisory limit, enforced by callers rather than the client.
    pub max_question_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_question_length: DEFAULT_MAX_QUESTION_LENGTH,
        }
    }
}

impl Config {
    /// Load configuration from environment overrides, falling back to defaults.
    ///
    /// Unset or empty variables keep the default. Numeric variables that
    /// fail to parse are reported as errors naming the variable.
    pub fn load<R: Runtime + ?Sized>(runtime: &R) -> Result<Self> {
        let defaults = Self::default();

        let base_url = env_string(runtime, ENV_BASE_URL).unwrap_or(defaults.base_url);
        let api_key = env_string(runtime, ENV_API_KEY).unwrap_or(defaults.api_key);
        let api_key_header =
            env_string(runtime, ENV_API_KEY_HEADER).unwrap_or(defaults.api_key_header);
        let max_retries = env_parse(runtime, ENV_MAX_RETRIES)?.unwrap_or(defaults.max_retries);
        let retry_delay = env_parse::<u64, _>(runtime, ENV_RETRY_DELAY_MS)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry_delay);
        let max_question_length = env_parse(runtime, ENV_MAX_QUESTION_LENGTH)?
            .unwrap_or(defaults.max_question_length);

        let config = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_key_header,
            max_retries,
            retry_delay,
            max_question_length,
        };

        debug!(
            "Loaded config: base_url={}, api_key_header={}, api_key set={}, max_retries={}, retry_delay={:?}",
            config.base_url,
            config.api_key_header,
            !config.api_key.is_empty(),
            config.max_retries,
            config.retry_delay
        );

        Ok(config)
    }

    /// Returns a copy pointing at a different service root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Joins the base URL and an endpoint path such as `generate/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn env_string<R: Runtime + ?Sized>(runtime: &R, key: &str) -> Option<String> {
    runtime.env_var(key).ok().filter(|v| !v.is_empty())
}

fn env_parse<T, R>(runtime: &R, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    R: Runtime + ?Sized,
{
    env_string(runtime, key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use std::collections::HashMap;

    fn runtime_with(vars: &[(&str, &str)]) -> MockRuntime {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .returning(move |key| vars.get(key).cloned().ok_or(std::env::VarError::NotPresent));
        runtime
    }

    #[test]
    fn test_load_defaults() {
        let config = Config::load(&runtime_with(&[])).unwrap();

        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.api_key, "");
        assert_eq!(config.api_key_header, "X-API-Key");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_millis(1000));
        assert_eq!(config.max_question_length, 500);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_overrides() {
        let runtime = runtime_with(&[
            ("ASK_API_BASE_URL", "https://qa.example.com/"),
            ("ASK_API_KEY", "secret"),
            ("ASK_API_KEY_HEADER", "X-Custom-Key"),
            ("ASK_MAX_RETRIES", "5"),
            ("ASK_RETRY_DELAY_MS", "250"),
            ("ASK_MAX_QUESTION_LENGTH", "1000"),
        ]);

        let config = Config::load(&runtime).unwrap();

        assert_eq!(config.base_url, "https://qa.example.com");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.api_key_header, "X-Custom-Key");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.max_question_length, 1000);
    }

    #[test]
    fn test_load_empty_values_keep_defaults() {
        let runtime = runtime_with(&[("ASK_API_BASE_URL", ""), ("ASK_MAX_RETRIES", "")]);

        let config = Config::load(&runtime).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_load_zero_retries_is_allowed() {
        let config = Config::load(&runtime_with(&[("ASK_MAX_RETRIES", "0")])).unwrap();
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_load_invalid_number_names_variable() {
        let err = Config::load(&runtime_with(&[("ASK_RETRY_DELAY_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("ASK_RETRY_DELAY_MS"));

        let err = Config::load(&runtime_with(&[("ASK_MAX_RETRIES", "-1")])).unwrap_err();
        assert!(err.to_string().contains("ASK_MAX_RETRIES"));
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let config = Config::default().with_base_url("http://host:9000/");

        assert_eq!(config.endpoint("generate/"), "http://host:9000/generate/");
        assert_eq!(config.endpoint("/chat/"), "http://host:9000/chat/");
        assert_eq!(config.endpoint(""), "http://host:9000/");
    }

    #[test]
    fn test_endpoint_trims_literal_base_url() {
        let config = Config {
            base_url: "http://host:9000//".to_string(),
            ..Config::default()
        };

        assert_eq!(config.endpoint("generate/"), "http://host:9000/generate/");
    }
}
