//! Site constants, request headers and the closed filter enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SiteError;

/// Root of the catalog site.
pub const ROOT_URL: &str = "https://smutba.se";

/// Path prefix of model detail pages.
pub const MODEL_PATH: &str = "/project/";

/// Markers that identify the site's soft not-found page.
pub const NOT_FOUND_MARKERS: &[&str] = &["Page not Found"];

/// Query parameter toggling mature-filtered content.
pub const MATURE_FILTER_PARAM: &str = "furry";

/// Upper bound of pages sampled by `get_random`.
pub const RANDOM_PAGE_CAP: u32 = 50;

/// Browser-like user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Headers sent alongside the user agent.
///
/// `Accept-Encoding` and `Connection` are left to reqwest, which negotiates
/// compression and keep-alive itself.
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Upgrade-Insecure-Requests", "1"),
];

/// Category filter of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// No filtering.
    #[default]
    Any,
    /// 3D models.
    Models,
    /// Textures.
    Textures,
    /// Sceneries.
    Sceneries,
    /// HDRIs.
    Hdris,
    /// Everything else.
    Other,
}

impl Category {
    /// All categories, in site order.
    pub const ALL: [Self; 6] = [
        Self::Any,
        Self::Models,
        Self::Textures,
        Self::Sceneries,
        Self::Hdris,
        Self::Other,
    ];

    /// User-facing name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Models => "models",
            Self::Textures => "textures",
            Self::Sceneries => "sceneries",
            Self::Hdris => "hdris",
            Self::Other => "other",
        }
    }

    /// Site-internal code used in the `category` query parameter.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Models => "1",
            Self::Textures => "2",
            Self::Sceneries => "3",
            Self::Hdris => "4",
            Self::Other => "5",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = SiteError;

    /// Accepts either the name or the site code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == needle || c.code() == needle)
            .ok_or_else(|| SiteError::parse(format!("unknown category: {s}")))
    }
}

/// Sort order of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Most recently updated first (site default).
    #[default]
    LastUpdated,
    /// Newest uploads first.
    Newest,
    /// Oldest uploads first.
    Oldest,
    /// Most viewed first.
    MostViewed,
    /// Most downloaded first.
    MostDownloaded,
}

impl SortBy {
    /// All sort orders.
    pub const ALL: [Self; 5] = [
        Self::LastUpdated,
        Self::Newest,
        Self::Oldest,
        Self::MostViewed,
        Self::MostDownloaded,
    ];

    /// Value of the `sort` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LastUpdated => "last_updated",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::MostViewed => "most_viewed",
            Self::MostDownloaded => "most_downloaded",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == needle)
            .ok_or_else(|| SiteError::parse(format!("unknown sort order: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes() {
        assert_eq!(Category::Any.code(), "any");
        assert_eq!(Category::Models.code(), "1");
        assert_eq!(Category::Other.code(), "5");
    }

    #[test]
    fn test_category_from_name_or_code() {
        assert_eq!("Textures".parse::<Category>().unwrap(), Category::Textures);
        assert_eq!("4".parse::<Category>().unwrap(), Category::Hdris);
        assert!("furniture".parse::<Category>().is_err());
    }

    #[test]
    fn test_sort_round_trip_names() {
        for sort in SortBy::ALL {
            assert_eq!(sort.as_str().parse::<SortBy>().unwrap(), sort);
        }
        assert_eq!(SortBy::default(), SortBy::LastUpdated);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_value(SortBy::MostViewed).unwrap(),
            serde_json::json!("most_viewed")
        );
        assert_eq!(
            serde_json::from_value::<Category>(serde_json::json!("sceneries")).unwrap(),
            Category::Sceneries
        );
    }
}
