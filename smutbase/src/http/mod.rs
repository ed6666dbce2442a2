//! HTTP layer for the site client.
//!
//! This module provides:
//! - Client configuration supplied by the host
//! - A single-attempt [`Transport`] protocol and its reqwest implementation
//! - A retry loop with linear backoff
//! - The [`Fetcher`], which classifies responses and retries transient failures

mod config;
mod fetcher;
mod retry;
mod transport;

pub use config::ClientConfig;
pub use fetcher::Fetcher;
pub use retry::{should_retry, with_retry, RetryConfig, RetryDecision, Retryable};
pub use transport::{ReqwestTransport, Transport, TransportResponse};

#[cfg(test)]
pub use transport::MockTransport;
