//! Client configuration supplied by the host.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::retry::RetryConfig;
use crate::consts::DEFAULT_USER_AGENT;
use crate::errors::{Result, SiteError};

/// Configuration for the HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Outbound proxy, e.g. `http://127.0.0.1:7890`.
    #[serde(default)]
    pub proxy: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Maximum number of attempts per request, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Backoff unit in milliseconds; attempt `n` waits `n` units.
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Additional headers to include.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Whether to verify TLS certificates.
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

fn default_timeout() -> f64 {
    30.0
}

fn default_max_retries() -> usize {
    3
}

fn default_retry_base_delay() -> u64 {
    1000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_verify_ssl() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay(),
            user_agent: default_user_agent(),
            headers: HashMap::new(),
            verify_ssl: default_verify_ssl(),
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SiteError::parse(format!("invalid client config: {e}")))
    }

    /// Sets the proxy. An empty string clears it.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        let proxy = proxy.into();
        self.proxy = (!proxy.trim().is_empty()).then_some(proxy);
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum attempts.
    #[must_use]
    pub fn with_max_retries(mut self, attempts: usize) -> Self {
        self.max_retries = attempts;
        self
    }

    /// Sets the backoff unit.
    #[must_use]
    pub fn with_retry_base_delay_ms(mut self, delay: u64) -> Self {
        self.retry_base_delay_ms = delay;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Gets timeout as Duration. Non-positive values fall back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        if self.timeout_seconds.is_finite() && self.timeout_seconds > 0.0 {
            Duration::from_secs_f64(self.timeout_seconds)
        } else {
            Duration::from_secs_f64(default_timeout())
        }
    }

    /// Retry policy: linear backoff in units of `retry_base_delay_ms`.
    #[must_use]
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .with_max_attempts(self.max_retries)
            .with_base_delay_ms(self.retry_base_delay_ms)
    }
}
