//! Query orchestrator for the smutba.se catalog.
//!
//! [`Client`] composes ID normalization, the retrying [`Fetcher`] and the
//! page extractors into the five host-facing operations.

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Url;
use std::sync::Arc;

use crate::consts::{Category, SortBy, NOT_FOUND_MARKERS, RANDOM_PAGE_CAP, ROOT_URL};
use crate::errors::{Result, SiteError};
use crate::extract::{parse_model_page, parse_search_results};
use crate::http::{ClientConfig, Fetcher, Transport};
use crate::model::{Model, SearchQuery, SearchResult};

/// Async client for model lookups and catalog listings.
#[derive(Debug, Clone)]
pub struct Client {
    fetcher: Fetcher,
}

impl Client {
    /// Creates a client over a reqwest connection pool.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            fetcher: Fetcher::new(config),
        }
    }

    /// Creates a client over any transport. Only the retry settings of
    /// `config` apply; connection settings belong to the transport.
    #[must_use]
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            fetcher: Fetcher::with_transport(transport, config.retry_config()),
        }
    }

    /// Fetches the full detail record of a model.
    ///
    /// `id_or_url` may be a bare UUID or any text containing a project path.
    pub async fn get_model(&self, id_or_url: &str) -> Result<Model> {
        let model = Model::from_id(id_or_url)?;
        let url = model.full_url();
        let html = self.fetcher.fetch(&url).await?;

        if NOT_FOUND_MARKERS.iter().any(|marker| html.contains(marker)) {
            return Err(SiteError::not_found(format!("model does not exist: {}", model.id())));
        }

        let model = parse_model_page(&html, model)?;
        tracing::info!(id = %model.id(), title = %model.title, "Fetched model");
        Ok(model)
    }

    /// Runs a catalog search.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let url = search_url(query)?;
        let html = self.fetcher.fetch(url.as_str()).await?;

        let mut result = parse_search_results(&html, query.page)?;
        result.query.clone_from(&query.query);
        result.current_page = query.page.max(1);

        tracing::info!(
            url = %url,
            models = result.models.len(),
            total_pages = result.total_pages,
            "Search completed"
        );
        Ok(result)
    }

    /// Newest models, optionally within one category.
    pub async fn get_latest(&self, page: u32, category: Category) -> Result<SearchResult> {
        self.listing(page, category, SortBy::Newest).await
    }

    /// Most viewed models, optionally within one category.
    pub async fn get_popular(&self, page: u32, category: Category) -> Result<SearchResult> {
        self.listing(page, category, SortBy::MostViewed).await
    }

    async fn listing(&self, page: u32, category: Category, sort: SortBy) -> Result<SearchResult> {
        let query = SearchQuery::default()
            .with_category(category)
            .with_sort(sort)
            .with_page(page);
        self.search(&query).await
    }

    /// A random model, or `None` when the catalog lists nothing.
    ///
    /// Samples a page among the first [`RANDOM_PAGE_CAP`] and returns the full
    /// record of one of its models. If the sampled page is empty, a listing
    /// entry from page 1 is returned without a detail fetch.
    pub async fn get_random(&self) -> Result<Option<Model>> {
        let first = self.search(&SearchQuery::default()).await?;
        if first.is_empty() {
            return Ok(None);
        }

        let bound = first.total_pages.clamp(1, RANDOM_PAGE_CAP);
        let page = rand::thread_rng().gen_range(1..=bound);
        let sampled = self.search(&SearchQuery::default().with_page(page)).await?;

        if sampled.is_empty() {
            tracing::debug!(page, "Sampled page is empty, using first page");
            return Ok(first.models.choose(&mut rand::thread_rng()).cloned());
        }

        let id = match sampled.models.choose(&mut rand::thread_rng()) {
            Some(model) => model.id().to_string(),
            None => return Ok(None),
        };
        self.get_model(&id).await.map(Some)
    }

    /// Releases the connection pool. Later calls reopen it.
    pub fn close(&self) {
        self.fetcher.close();
    }
}

/// Listing URL for a query; the query string is omitted when every
/// parameter is at its default.
fn search_url(query: &SearchQuery) -> Result<Url> {
    let base = format!("{ROOT_URL}/");
    let mut url = Url::parse(&base).map_err(|e| SiteError::invalid_url(format!("{base}: {e}")))?;
    let params = query.to_params();
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}
