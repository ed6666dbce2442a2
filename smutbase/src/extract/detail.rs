//! Detail page extraction.
//!
//! Each field has its own extractor of shape `fn(&DetailPage) -> Option<T>`;
//! [`parse_model_page`] runs them in turn and keeps the model's current value
//! whenever an extractor finds nothing.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::{ensure_markup, parse_count, selector, stripped_text, truncate_chars};
use crate::errors::Result;
use crate::model::{Author, Model};

/// Maximum length of the licence text.
pub const LICENCE_MAX_CHARS: usize = 100;

/// Maximum number of tags kept.
pub const MAX_TAGS: usize = 10;

#[allow(clippy::expect_used)]
static AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)Support\s+<a[^>]*href="([^"]+)"[^>]*>([^<]+)</a>"#)
        .expect("author regex is valid")
});

static VIEWS: LazyLock<Regex> = LazyLock::new(|| labelled_count("Views"));
static DOWNLOADS: LazyLock<Regex> = LazyLock::new(|| labelled_count("Downloads"));
static POSTED: LazyLock<Regex> = LazyLock::new(|| labelled_text("Posted"));
static PUBLISHED: LazyLock<Regex> = LazyLock::new(|| labelled_text("Published"));
static UPDATED: LazyLock<Regex> = LazyLock::new(|| labelled_text("Updated"));

#[allow(clippy::expect_used)]
static CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<strong>\s*Category\s*</strong>\s*<br[^>]*>\s*<a[^>]*>([^<]+)</a>")
        .expect("category regex is valid")
});

#[allow(clippy::expect_used)]
static LICENCE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Creative Commons|CC BY|CC0|License").expect("licence regex is valid")
});

static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img[src]"));
static TAG_LINK: LazyLock<Selector> = LazyLock::new(|| selector(r#"a[href*="/tag/"]"#));
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:image"][content]"#));
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:description"][content]"#));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"][content]"#));

/// `<strong>Label</strong><br>12,345`
#[allow(clippy::expect_used)]
fn labelled_count(label: &str) -> Regex {
    Regex::new(&format!(r"(?is)<strong>\s*{label}\s*</strong>\s*<br[^>]*>\s*([\d,]+)"))
        .expect("labelled count regex is valid")
}

/// `<strong>Label</strong><br>free text<`
#[allow(clippy::expect_used)]
fn labelled_text(label: &str) -> Regex {
    Regex::new(&format!(r"(?is)<strong>\s*{label}\s*</strong>\s*<br[^>]*>\s*([^<]+)<"))
        .expect("labelled text regex is valid")
}

/// A parsed detail page: the raw text for pattern extractors and the DOM for
/// selector extractors.
pub struct DetailPage<'a> {
    raw: &'a str,
    document: Html,
}

impl<'a> DetailPage<'a> {
    /// Parses a page, failing only when the input is not markup.
    pub fn parse(raw: &'a str) -> Result<Self> {
        ensure_markup(raw)?;
        Ok(Self {
            raw,
            document: Html::parse_document(raw),
        })
    }

    fn capture(&self, re: &Regex) -> Option<String> {
        re.captures(self.raw)
            .map(|caps| caps[1].trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Text of the first `h1`.
pub fn extract_title(page: &DetailPage<'_>) -> Option<String> {
    page.document
        .select(&H1)
        .next()
        .map(|h1| stripped_text(&h1))
        .filter(|t| !t.is_empty())
}

/// The "Support <a>" link naming the uploader.
pub fn extract_author(page: &DetailPage<'_>) -> Option<Author> {
    let caps = AUTHOR.captures(page.raw)?;
    let name = caps[2].trim();
    if name.is_empty() {
        return None;
    }
    Some(Author::new(name, caps[1].trim()))
}

/// The social preview image, else the first project/thumbnail image.
pub fn extract_thumbnail(page: &DetailPage<'_>) -> Option<String> {
    let og = page
        .document
        .select(&OG_IMAGE)
        .filter_map(|meta| meta.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty());
    if let Some(content) = og {
        return Some(content.to_string());
    }

    page.document
        .select(&IMG)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| {
            let lower = src.to_ascii_lowercase();
            lower.contains("project") || lower.contains("thumbnail")
        })
        .map(String::from)
}

/// The view counter.
pub fn extract_views(page: &DetailPage<'_>) -> Option<u64> {
    page.capture(&VIEWS).as_deref().and_then(parse_count)
}

/// The download counter.
pub fn extract_downloads(page: &DetailPage<'_>) -> Option<u64> {
    page.capture(&DOWNLOADS).as_deref().and_then(parse_count)
}

/// The posting date, verbatim.
pub fn extract_posted(page: &DetailPage<'_>) -> Option<String> {
    page.capture(&POSTED)
}

/// The publishing date, verbatim.
pub fn extract_published(page: &DetailPage<'_>) -> Option<String> {
    page.capture(&PUBLISHED)
}

/// The last update date, verbatim.
pub fn extract_updated(page: &DetailPage<'_>) -> Option<String> {
    page.capture(&UPDATED)
}

/// The category link text.
pub fn extract_category(page: &DetailPage<'_>) -> Option<String> {
    page.capture(&CATEGORY)
}

/// Text of the element holding the first licence keyword.
pub fn extract_licence(page: &DetailPage<'_>) -> Option<String> {
    page.document
        .root_element()
        .descendants()
        .filter(|node| node.value().as_text().is_some_and(|t| LICENCE_KEYWORDS.is_match(t)))
        .find_map(|node| {
            let parent = node.parent().and_then(ElementRef::wrap)?;
            if matches!(parent.value().name(), "script" | "style") {
                return None;
            }
            Some(truncate_chars(&stripped_text(&parent), LICENCE_MAX_CHARS))
        })
        .filter(|t| !t.is_empty())
}

/// Texts of the first tag links.
pub fn extract_tags(page: &DetailPage<'_>) -> Option<Vec<String>> {
    let tags: Vec<String> = page
        .document
        .select(&TAG_LINK)
        .take(MAX_TAGS)
        .map(|a| stripped_text(&a))
        .collect();
    (!tags.is_empty()).then_some(tags)
}

/// The social preview description, else the meta description.
pub fn extract_description(page: &DetailPage<'_>) -> Option<String> {
    [&*OG_DESCRIPTION, &*META_DESCRIPTION]
        .into_iter()
        .flat_map(|sel| page.document.select(sel))
        .filter_map(|meta| meta.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(String::from)
}

/// Fills `model` from a detail page.
///
/// Fields whose extractor finds nothing keep their current value.
pub fn parse_model_page(html: &str, mut model: Model) -> Result<Model> {
    let page = DetailPage::parse(html)?;

    if let Some(title) = extract_title(&page) {
        model.title = title;
    }
    if let Some(author) = extract_author(&page) {
        model.author = Some(author);
    }
    if let Some(thumbnail) = extract_thumbnail(&page) {
        model.thumbnail = thumbnail;
    }
    if let Some(views) = extract_views(&page) {
        model.views = views;
    }
    if let Some(downloads) = extract_downloads(&page) {
        model.downloads = downloads;
    }
    if let Some(posted) = extract_posted(&page) {
        model.posted = posted;
    }
    if let Some(published) = extract_published(&page) {
        model.published = published;
    }
    if let Some(updated) = extract_updated(&page) {
        model.updated = updated;
    }
    if let Some(category) = extract_category(&page) {
        model.category = category;
    }
    if let Some(licence) = extract_licence(&page) {
        model.licence = licence;
    }
    if let Some(description) = extract_description(&page) {
        model.description = description;
    }
    if let Some(tags) = extract_tags(&page) {
        model.tags = tags;
    }

    tracing::debug!(
        model_id = %model.id(),
        title = %model.title,
        tags = model.tags.len(),
        "Parsed model page"
    );

    Ok(model)
}
