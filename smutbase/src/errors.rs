//! Error types for the smutbase client.
//!
//! Every failure the client reports is a [`SiteError`], so callers can match
//! broadly on the enum or narrowly on a single variant. Network failures carry
//! a [`NetworkError`] describing where and how the request failed.

use std::collections::HashMap;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = SiteError> = std::result::Result<T, E>;

/// The main error type for site operations.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The input does not resemble any recognizable site URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The input cannot be normalized to a model UUID.
    #[error("Invalid model ID: {0}")]
    InvalidModelId(String),

    /// The site answered 404 or served its not-found page.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// A request failed at the transport or HTTP level.
    #[error("{0}")]
    Network(#[from] NetworkError),

    /// The input handed to the extraction engine was not markup.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SiteError {
    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(input: impl Into<String>) -> Self {
        Self::InvalidUrl(input.into())
    }

    /// Creates an invalid model ID error.
    #[must_use]
    pub fn invalid_model_id(input: impl Into<String>) -> Self {
        Self::InvalidModelId(input.into())
    }

    /// Creates a model not found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::ModelNotFound(what.into())
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Short, stable name of the error kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "InvalidURL",
            Self::InvalidModelId(_) => "InvalidModelID",
            Self::ModelNotFound(_) => "ModelNotFound",
            Self::Network(_) => "NetworkError",
            Self::Parse(_) => "ParseError",
        }
    }

    /// Whether repeating the request could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind_name()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        if let Self::Network(e) = self {
            map.insert("url".to_string(), serde_json::json!(e.url));
            if let Some(status) = e.status {
                map.insert("status".to_string(), serde_json::json!(status));
            }
        }
        map
    }
}

/// How a network request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// Connection, DNS, TLS or body read failure.
    Transport,
    /// The request exceeded the configured timeout.
    Timeout,
    /// The server answered with an unexpected status code.
    Status,
    /// The HTTP client could not be built (bad proxy, bad header).
    Client,
}

/// Error raised when a request cannot produce a usable response.
#[derive(Debug, Clone, Error)]
#[error("Network error ({kind:?}) for {url}: {message}")]
pub struct NetworkError {
    /// What went wrong.
    pub message: String,
    /// The requested URL.
    pub url: String,
    /// HTTP status, when the server answered.
    pub status: Option<u16>,
    /// Failure classification.
    pub kind: NetworkErrorKind,
}

impl NetworkError {
    /// Creates a transport-level error.
    #[must_use]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            url: url.into(),
            status: None,
            kind: NetworkErrorKind::Transport,
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            url: url.into(),
            status: None,
            kind: NetworkErrorKind::Timeout,
        }
    }

    /// Creates an unexpected status error.
    #[must_use]
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self {
            message: format!("HTTP {status}"),
            url: url.into(),
            status: Some(status),
            kind: NetworkErrorKind::Status,
        }
    }

    /// Creates a client construction error.
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            url: String::new(),
            status: None,
            kind: NetworkErrorKind::Client,
        }
    }

    /// Whether the failure is transient and worth retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self.kind, NetworkErrorKind::Transport | NetworkErrorKind::Timeout)
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(ToString::to_string).unwrap_or_default();
        if e.is_timeout() {
            Self::timeout(url, e.to_string())
        } else if e.is_builder() {
            Self {
                url,
                ..Self::client(e.to_string())
            }
        } else {
            Self::transport(url, e.to_string())
        }
    }
}
