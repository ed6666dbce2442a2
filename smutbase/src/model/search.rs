//! Search requests and listing results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::records::Model;
use crate::consts::{Category, SortBy, MATURE_FILTER_PARAM};

fn default_page() -> u32 {
    1
}

/// Parameters of a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query.
    #[serde(default)]
    pub query: String,
    /// Category filter.
    #[serde(default)]
    pub category: Category,
    /// Sort order.
    #[serde(default)]
    pub sort: SortBy,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Whether to include mature-filtered content.
    #[serde(default)]
    pub include_mature: bool,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: Category::Any,
            sort: SortBy::LastUpdated,
            page: default_page(),
            include_mature: false,
        }
    }
}

impl SearchQuery {
    /// Creates a query for the given text.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn with_sort(mut self, sort: SortBy) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the page. Page numbers below 1 are clamped to 1.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Includes mature-filtered content.
    #[must_use]
    pub fn with_mature(mut self, include: bool) -> Self {
        self.include_mature = include;
        self
    }

    /// Query-string parameters, omitting every value left at the site default.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.query.is_empty() {
            params.push(("q", self.query.clone()));
        }
        if self.category != Category::Any {
            params.push(("category", self.category.code().to_string()));
        }
        if self.sort != SortBy::LastUpdated {
            params.push(("sort", self.sort.as_str().to_string()));
        }
        if self.page > 1 {
            params.push(("page", self.page.to_string()));
        }
        if self.include_mature {
            params.push((MATURE_FILTER_PARAM, "on".to_string()));
        }
        params
    }
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Models in site order.
    #[serde(default)]
    pub models: Vec<Model>,
    /// Best-effort page count.
    #[serde(default = "default_page")]
    pub total_pages: u32,
    /// Page this result represents.
    #[serde(default = "default_page")]
    pub current_page: u32,
    /// Query that produced the page.
    #[serde(default)]
    pub query: String,
}

impl Default for SearchResult {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            total_pages: default_page(),
            current_page: default_page(),
            query: String::new(),
        }
    }
}

impl SearchResult {
    /// Creates an empty result for a query.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Number of models on this page.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.models.len()
    }

    /// Whether the page holds no models.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    /// Plain-text listing of the first `max_items` models.
    #[must_use]
    pub fn format_list(&self, max_items: usize) -> String {
        if self.models.is_empty() {
            return "No models found".to_string();
        }

        let mut lines = vec![format!(
            "🔍 Results (page {}/{}):\n",
            self.current_page, self.total_pages
        )];

        for (i, model) in self.models.iter().take(max_items).enumerate() {
            let author = model.author.as_ref().map_or("unknown", |a| a.name.as_str());
            lines.push(format!("{}. {}", i + 1, model.title));
            lines.push(format!("   ID: {} | 👤 {}", model.id(), author));
        }

        if self.models.len() > max_items {
            lines.push(format!("\n... {} more", self.models.len() - max_items));
        }

        lines.join("\n")
    }

    /// Converts to dictionary.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut dict = HashMap::new();
        dict.insert("query".to_string(), serde_json::json!(self.query));
        dict.insert("current_page".to_string(), serde_json::json!(self.current_page));
        dict.insert("total_pages".to_string(), serde_json::json!(self.total_pages));
        dict.insert(
            "models".to_string(),
            serde_json::json!(self.models.iter().map(Model::to_dict).collect::<Vec<_>>()),
        );
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Author;

    fn model(n: u8, title: &str) -> Model {
        let id = format!("00000000-0000-0000-0000-0000000000{n:02x}");
        let mut model = Model::from_id(&id).unwrap();
        model.title = title.to_string();
        model
    }

    #[test]
    fn test_default_query_has_no_params() {
        assert!(SearchQuery::default().to_params().is_empty());
        assert!(SearchQuery::new("").with_page(1).to_params().is_empty());
    }

    #[test]
    fn test_non_default_params() {
        let params = SearchQuery::new("chair")
            .with_category(Category::Models)
            .with_sort(SortBy::MostViewed)
            .with_page(3)
            .with_mature(true)
            .to_params();

        assert_eq!(
            params,
            vec![
                ("q", "chair".to_string()),
                ("category", "1".to_string()),
                ("sort", "most_viewed".to_string()),
                ("page", "3".to_string()),
                ("furry", "on".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_clamped() {
        assert_eq!(SearchQuery::default().with_page(0).page, 1);
    }

    #[test]
    fn test_result_defaults() {
        let result = SearchResult::new("q");
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.current_page, 1);
        assert!(result.is_empty());
        assert!(!result.has_next_page());
        assert!(!result.has_prev_page());
    }

    #[test]
    fn test_page_navigation() {
        let result = SearchResult {
            total_pages: 5,
            current_page: 2,
            ..Default::default()
        };
        assert!(result.has_next_page());
        assert!(result.has_prev_page());
    }

    #[test]
    fn test_format_list_empty() {
        assert_eq!(SearchResult::default().format_list(10), "No models found");
    }

    #[test]
    fn test_format_list_truncates() {
        let mut first = model(1, "First");
        first.author = Some(Author::new("maker", "/member/maker/"));
        let result = SearchResult {
            models: vec![first, model(2, "Second"), model(3, "Third")],
            total_pages: 4,
            current_page: 1,
            query: String::new(),
        };

        let text = result.format_list(2);
        assert!(text.starts_with("🔍 Results (page 1/4):"));
        assert!(text.contains("1. First"));
        assert!(text.contains("👤 maker"));
        assert!(text.contains("2. Second\n   ID: 00000000-0000-0000-0000-000000000002 | 👤 unknown"));
        assert!(!text.contains("Third"));
        assert!(text.ends_with("... 1 more"));
    }
}
