//! # Smutbase
//!
//! An async scraping client for the smutba.se 3D model catalog.
//!
//! The crate provides:
//!
//! - **ID normalization**: bare UUIDs and project URLs resolve to one canonical ID
//! - **Extraction**: detail and listing pages become typed [`Model`](model::Model) records
//! - **Retrying HTTP**: a pooled reqwest transport with linear backoff
//! - **Orchestration**: lookups, searches, latest/popular listings and random picks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use smutbase::prelude::*;
//!
//! let client = Client::new(ClientConfig::new().with_timeout(10.0));
//!
//! let model = client.get_model("b8c7264b-29e7-4091-bb73-3eac2fddb350").await?;
//! println!("{}", model.format_info());
//!
//! let result = client.search(&SearchQuery::new("chair").with_sort(SortBy::Newest)).await?;
//! println!("{}", result.format_list(10));
//!
//! client.close();
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod client;
pub mod consts;
pub mod errors;
pub mod extract;
pub mod http;
pub mod model;
pub mod observability;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::Client;
    pub use crate::consts::{Category, SortBy};
    pub use crate::errors::{NetworkError, NetworkErrorKind, Result, SiteError};
    pub use crate::http::{ClientConfig, Transport, TransportResponse};
    pub use crate::model::{Author, Model, SearchQuery, SearchResult};
    pub use crate::observability::init_tracing;
}
