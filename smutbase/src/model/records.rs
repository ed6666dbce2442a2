//! Catalog records: [`Author`] and [`Model`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::ids::{absolutize, canonical_url, extract_id_from_path, normalize_model_id};
use crate::errors::{Result, SiteError};

/// Maximum number of tags shown by [`Model::format_info`].
const INFO_TAG_LIMIT: usize = 5;

/// Uploader of a model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Profile link, relative or absolute.
    #[serde(default)]
    pub url: String,
}

impl Author {
    /// Creates a new author.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Absolute profile URL, or empty when unknown.
    #[must_use]
    pub fn profile_url(&self) -> String {
        absolutize(&self.url)
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One catalog entry.
///
/// The ID is always a lowercase hyphenated UUID: every constructor,
/// deserialization included, rejects anything else. Other fields start at
/// their defaults and are filled in by the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Model {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    /// Page URL of the model.
    #[serde(default)]
    pub canonical_url: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Uploader.
    #[serde(default)]
    pub author: Option<Author>,
    /// Preview image, relative or absolute.
    #[serde(default)]
    pub thumbnail: String,
    /// View count.
    #[serde(default)]
    pub views: u64,
    /// Download count.
    #[serde(default)]
    pub downloads: u64,
    /// Posting date as printed by the site.
    #[serde(default)]
    pub posted: String,
    /// Publishing date as printed by the site.
    #[serde(default)]
    pub published: String,
    /// Last update date as printed by the site.
    #[serde(default)]
    pub updated: String,
    /// Category name.
    #[serde(default)]
    pub category: String,
    /// Licence text.
    #[serde(default)]
    pub licence: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Tags, in page order.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Model {
    /// Creates a model from a bare ID or any text containing a project path.
    pub fn from_id(input: &str) -> Result<Self> {
        let id = normalize_model_id(input)?;
        let canonical_url = canonical_url(&id);
        Ok(Self::blank(id, canonical_url))
    }

    /// Creates a model from a page URL, keeping that URL.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url.trim();
        let id = extract_id_from_path(url).ok_or_else(|| SiteError::invalid_url(url))?;
        Ok(Self::blank(id, url.to_string()))
    }

    fn blank(id: String, canonical_url: String) -> Self {
        Self {
            id,
            canonical_url,
            title: String::new(),
            author: None,
            thumbnail: String::new(),
            views: 0,
            downloads: 0,
            posted: String::new(),
            published: String::new(),
            updated: String::new(),
            category: String::new(),
            licence: String::new(),
            description: String::new(),
            tags: Vec::new(),
        }
    }

    /// Lowercase hyphenated UUID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Absolute page URL.
    #[must_use]
    pub fn full_url(&self) -> String {
        if self.canonical_url.is_empty() {
            canonical_url(&self.id)
        } else {
            absolutize(&self.canonical_url)
        }
    }

    /// Absolute thumbnail URL, or empty when unknown.
    #[must_use]
    pub fn thumbnail_url(&self) -> String {
        absolutize(&self.thumbnail)
    }

    /// Converts to dictionary.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut dict = HashMap::new();
        dict.insert("model_id".to_string(), serde_json::json!(self.id));
        dict.insert("url".to_string(), serde_json::json!(self.full_url()));
        dict.insert("title".to_string(), serde_json::json!(self.title));
        dict.insert(
            "author".to_string(),
            serde_json::json!(self.author.as_ref().map_or("", |a| a.name.as_str())),
        );
        dict.insert(
            "author_url".to_string(),
            serde_json::json!(self.author.as_ref().map(Author::profile_url).unwrap_or_default()),
        );
        dict.insert("thumbnail".to_string(), serde_json::json!(self.thumbnail_url()));
        dict.insert("views".to_string(), serde_json::json!(self.views));
        dict.insert("downloads".to_string(), serde_json::json!(self.downloads));
        dict.insert("posted".to_string(), serde_json::json!(self.posted));
        dict.insert("published".to_string(), serde_json::json!(self.published));
        dict.insert("updated".to_string(), serde_json::json!(self.updated));
        dict.insert("category".to_string(), serde_json::json!(self.category));
        dict.insert("licence".to_string(), serde_json::json!(self.licence));
        dict.insert("description".to_string(), serde_json::json!(self.description));
        dict.insert("tags".to_string(), serde_json::json!(self.tags));
        dict
    }

    /// Plain-text summary for chat hosts.
    ///
    /// Empty fields are skipped; counts use thousands separators.
    #[must_use]
    pub fn format_info(&self) -> String {
        let mut lines = vec![format!("📦 {}", self.title), format!("🔗 {}", self.full_url())];

        if let Some(ref author) = self.author {
            lines.push(format!("👤 Author: {}", author.name));
        }
        if !self.category.is_empty() {
            lines.push(format!("📁 Category: {}", self.category));
        }
        if self.views > 0 {
            lines.push(format!("👀 Views: {}", group_thousands(self.views)));
        }
        if self.downloads > 0 {
            lines.push(format!("📥 Downloads: {}", group_thousands(self.downloads)));
        }
        if !self.posted.is_empty() {
            lines.push(format!("📅 Posted: {}", self.posted));
        }
        if !self.updated.is_empty() {
            lines.push(format!("🔄 Updated: {}", self.updated));
        }
        if !self.licence.is_empty() {
            lines.push(format!("📜 Licence: {}", self.licence));
        }
        if !self.tags.is_empty() {
            let shown: Vec<&str> = self
                .tags
                .iter()
                .take(INFO_TAG_LIMIT)
                .map(String::as_str)
                .collect();
            lines.push(format!("🏷️ Tags: {}", shown.join(", ")));
        }

        lines.join("\n")
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model({}: {})", self.id, self.title)
    }
}

/// Accepts any form `normalize_model_id` resolves and stores the canonical one.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    normalize_model_id(&raw).map_err(serde::de::Error::custom)
}

/// Formats `12345` as `12,345`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ID: &str = "b8c7264b-29e7-4091-bb73-3eac2fddb350";

    #[test]
    fn test_from_id_canonicalizes() {
        let model = Model::from_id(&ID.to_uppercase()).unwrap();
        assert_eq!(model.id(), ID);
        assert_eq!(model.canonical_url, format!("https://smutba.se/project/{ID}/"));
        assert_eq!(model.full_url(), model.canonical_url);
        assert_eq!(model.title, "");
        assert_eq!(model.views, 0);
        assert!(model.tags.is_empty());
    }

    #[test]
    fn test_from_id_invalid() {
        assert!(matches!(
            Model::from_id("not-a-valid-id"),
            Err(SiteError::InvalidModelId(_))
        ));
    }

    #[test]
    fn test_from_url_keeps_url() {
        let model = Model::from_url(&format!("/project/{ID}/")).unwrap();
        assert_eq!(model.id(), ID);
        assert_eq!(model.canonical_url, format!("/project/{ID}/"));
        assert_eq!(model.full_url(), format!("https://smutba.se/project/{ID}/"));
    }

    #[test]
    fn test_deserialize_rejects_invalid_id() {
        let json = r#"{"id": "not-a-uuid", "title": "x"}"#;
        let err = serde_json::from_str::<Model>(json).unwrap_err();
        assert!(err.to_string().contains("Invalid model ID"));
        assert!(serde_json::from_str::<Model>(r#"{"title": "no id"}"#).is_err());
    }

    #[test]
    fn test_deserialize_canonicalizes_id() {
        let json = format!(r#"{{"id": "{}", "views": 7}}"#, ID.to_uppercase());
        let model: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(model.id(), ID);
        assert_eq!(model.views, 7);
        assert_eq!(model.full_url(), format!("https://smutba.se/project/{ID}/"));
    }

    #[test]
    fn test_serde_round_trip_keeps_fields() {
        let mut model = Model::from_id(ID).unwrap();
        model.title = "Chair".to_string();
        model.author = Some(Author::new("maker", "/member/maker/"));
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(serde_json::from_str::<Model>(&json).unwrap(), model);
    }

    #[test]
    fn test_from_url_invalid() {
        assert!(matches!(
            Model::from_url("https://smutba.se/about/"),
            Err(SiteError::InvalidUrl(_))
        ));
        assert!(matches!(Model::from_url(ID), Err(SiteError::InvalidUrl(_))));
    }

    #[test]
    fn test_author_profile_url() {
        assert_eq!(
            Author::new("someone", "/member/someone/").profile_url(),
            "https://smutba.se/member/someone/"
        );
        assert_eq!(
            Author::new("someone", "https://www.patreon.com/someone").profile_url(),
            "https://www.patreon.com/someone"
        );
        assert_eq!(Author::new("someone", "").profile_url(), "");
        assert_eq!(Author::new("someone", "").to_string(), "someone");
    }

    #[test]
    fn test_thumbnail_url() {
        let mut model = Model::from_id(ID).unwrap();
        assert_eq!(model.thumbnail_url(), "");
        model.thumbnail = "/media/project/thumb.jpg".to_string();
        assert_eq!(model.thumbnail_url(), "https://smutba.se/media/project/thumb.jpg");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(12_345_678), "12,345,678");
    }

    #[test]
    fn test_format_info_skips_empty_fields() {
        let mut model = Model::from_id(ID).unwrap();
        model.title = "Chair".to_string();
        model.views = 12_345;
        model.tags = (1..=7).map(|i| format!("t{i}")).collect();

        let info = model.format_info();
        assert!(info.starts_with("📦 Chair\n🔗 https://smutba.se/project/"));
        assert!(info.contains("👀 Views: 12,345"));
        assert!(info.contains("🏷️ Tags: t1, t2, t3, t4, t5"));
        assert!(!info.contains("t6"));
        assert!(!info.contains("Downloads"));
        assert!(!info.contains("Author"));
    }

    #[test]
    fn test_to_dict() {
        let mut model = Model::from_id(ID).unwrap();
        model.author = Some(Author::new("someone", "/member/someone/"));
        let dict = model.to_dict();
        assert_eq!(dict.get("model_id"), Some(&serde_json::json!(ID)));
        assert_eq!(dict.get("author"), Some(&serde_json::json!("someone")));
        assert_eq!(
            dict.get("author_url"),
            Some(&serde_json::json!("https://smutba.se/member/someone/"))
        );
        assert_eq!(dict.get("tags"), Some(&serde_json::json!([])));
    }

    #[test]
    fn test_display() {
        let mut model = Model::from_id(ID).unwrap();
        model.title = "Chair".to_string();
        assert_eq!(model.to_string(), format!("Model({ID}: Chair)"));
    }
}
