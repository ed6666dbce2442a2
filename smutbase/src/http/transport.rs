//! Single-attempt HTTP transport.
//!
//! A [`Transport`] performs exactly one GET and reports either the raw
//! response or a [`NetworkError`]. Retrying and status classification live in
//! [`Fetcher`](super::Fetcher).

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::time::Instant;

#[cfg(test)]
use mockall::automock;

use super::config::ClientConfig;
use crate::consts::DEFAULT_HEADERS;
use crate::errors::NetworkError;

/// Raw response of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a 200 response.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

/// Protocol for issuing one GET request.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches a URL once.
    async fn get(&self, url: &str) -> Result<TransportResponse, NetworkError>;

    /// Releases pooled connections. A later `get` may reopen them.
    fn close(&self);
}

/// reqwest-backed transport owning one lazily-built connection pool.
pub struct ReqwestTransport {
    config: ClientConfig,
    client: Mutex<Option<reqwest::Client>>,
}

impl ReqwestTransport {
    /// Creates a transport; no connection is opened until the first request.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: Mutex::new(None),
        }
    }

    /// Whether a pool is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.client.lock().is_some()
    }

    /// Returns the pooled client, building it on first use or after `close`.
    ///
    /// The handle is cloned out so the lock is released before any await.
    fn session(&self) -> Result<reqwest::Client, NetworkError> {
        let mut guard = self.client.lock();
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }
        let client = build_client(&self.config)?;
        tracing::debug!(proxy = ?self.config.proxy, "Opened HTTP connection pool");
        *guard = Some(client.clone());
        Ok(client)
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .field("open", &self.is_open())
            .finish()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, NetworkError> {
        let client = self.session()?;
        let start = Instant::now();

        let response = client.get(url).send().await.map_err(|e| with_url(e, url))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| with_url(e, url))?;

        tracing::debug!(
            url = %url,
            status,
            bytes = body.len(),
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Fetched page"
        );

        Ok(TransportResponse { status, body })
    }

    fn close(&self) {
        if self.client.lock().take().is_some() {
            tracing::debug!("Closed HTTP connection pool");
        }
    }
}

fn with_url(e: reqwest::Error, url: &str) -> NetworkError {
    let mut err = NetworkError::from(e);
    if err.url.is_empty() {
        err.url = url.to_string();
    }
    err
}

/// Builds the default header set plus configured extras.
pub(crate) fn build_headers(config: &ClientConfig) -> Result<HeaderMap, NetworkError> {
    let mut headers = HeaderMap::new();
    let user_agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|e| NetworkError::client(format!("invalid user agent: {e}")))?;
    headers.insert(USER_AGENT, user_agent);

    for (key, value) in DEFAULT_HEADERS {
        insert_header(&mut headers, key, value)?;
    }
    for (key, value) in &config.headers {
        insert_header(&mut headers, key, value)?;
    }
    Ok(headers)
}

fn insert_header(headers: &mut HeaderMap, key: &str, value: &str) -> Result<(), NetworkError> {
    let name = HeaderName::from_bytes(key.as_bytes())
        .map_err(|e| NetworkError::client(format!("invalid header name {key}: {e}")))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| NetworkError::client(format!("invalid header value for {key}: {e}")))?;
    headers.insert(name, value);
    Ok(())
}

fn build_client(config: &ClientConfig) -> Result<reqwest::Client, NetworkError> {
    let mut builder = reqwest::Client::builder()
        .default_headers(build_headers(config)?)
        .timeout(config.timeout())
        .danger_accept_invalid_certs(!config.verify_ssl);

    if let Some(ref proxy) = config.proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| NetworkError::client(format!("invalid proxy {proxy}: {e}")))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| NetworkError::client(format!("failed to build HTTP client: {e}")))
}
