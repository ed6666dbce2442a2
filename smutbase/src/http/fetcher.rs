//! Retrying page fetcher.

use std::sync::Arc;

use super::config::ClientConfig;
use super::retry::{with_retry, RetryConfig};
use super::transport::{ReqwestTransport, Transport};
use crate::errors::{NetworkError, Result, SiteError};
use crate::extract::decode_html_entities;

/// Fetches pages through a [`Transport`], retrying transient failures.
///
/// Each attempt is classified as follows:
///
/// | Outcome | Result |
/// |---|---|
/// | transport failure or timeout | retried, then `NetworkError` |
/// | HTTP 404 | `ModelNotFound`, no retry |
/// | any other non-200 status | `NetworkError`, no retry |
/// | HTTP 200 | body with entities decoded |
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
}

impl Fetcher {
    /// Creates a fetcher backed by reqwest.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let retry = config.retry_config();
        Self::with_transport(Arc::new(ReqwestTransport::new(config)), retry)
    }

    /// Creates a fetcher over any transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    /// Fetches a page and returns its decoded text.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        with_retry(&self.retry, url, || self.fetch_once(url)).await
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.transport.get(url).await?;
        match response.status {
            200 => Ok(decode_html_entities(&response.body)),
            404 => Err(SiteError::not_found(format!("page does not exist: {url}"))),
            status => Err(NetworkError::status(url, status).into()),
        }
    }

    /// Releases the transport's pooled connections.
    pub fn close(&self) {
        self.transport.close();
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher").field("retry", &self.retry).finish_non_exhaustive()
    }
}
