//! HTML extraction engine.
//!
//! Two independent pipelines turn raw page text into domain records:
//!
//! - [`detail`]: a single model page into a fully populated [`Model`](crate::model::Model)
//! - [`listing`]: a search/listing page into a [`SearchResult`](crate::model::SearchResult)
//!
//! Field extractors are total: a selector or pattern that does not match
//! leaves the field at its default instead of failing the parse.

pub mod detail;
pub mod listing;

use scraper::{ElementRef, Selector};

use crate::errors::{Result, SiteError};

pub use detail::{parse_model_page, DetailPage};
pub use listing::parse_search_results;

/// Decodes HTML character references against the full HTML5 table.
///
/// Numeric and named references are both decoded; text that is not a
/// reference is left as written.
#[must_use]
pub fn decode_html_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Fails when `html` cannot be markup at all.
pub(crate) fn ensure_markup(html: &str) -> Result<()> {
    if html.trim().is_empty() {
        return Err(SiteError::parse("empty document"));
    }
    if !html.contains('<') {
        return Err(SiteError::parse("document contains no markup"));
    }
    Ok(())
}

/// Compiles a static selector.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector `{css}`: {e}"))
}

/// Text of an element with every text node trimmed and empty ones dropped.
pub(crate) fn stripped_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// First `max` characters of `s`.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Parses a count such as `12,345`.
pub(crate) fn parse_count(raw: &str) -> Option<u64> {
    raw.trim().replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(
            decode_html_entities("a &lt; b &amp; c &gt; d &quot;e&quot;"),
            "a < b & c > d \"e\""
        );
        assert_eq!(decode_html_entities("Tom&#39;s &#x4E2D;"), "Tom's 中");
    }

    #[test]
    fn test_decode_accented_and_typographic_entities() {
        assert_eq!(decode_html_entities("Jos&eacute; &amp; Caf&eacute;"), "José & Café");
        assert_eq!(decode_html_entities("&Uuml;ber &hellip; &euro;5"), "Über … €5");
    }

    #[test]
    fn test_decode_leaves_plain_text() {
        assert_eq!(decode_html_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_html_entities("plain"), "plain");
    }

    #[test]
    fn test_ensure_markup() {
        assert!(ensure_markup("<h1>x</h1>").is_ok());
        assert!(matches!(ensure_markup("   "), Err(SiteError::Parse(_))));
        assert!(matches!(ensure_markup("{\"json\": true}"), Err(SiteError::Parse(_))));
    }

    #[test]
    fn test_stripped_text_joins_trimmed_nodes() {
        let doc = Html::parse_fragment("<div>  Hello <b> big </b>\n world </div>");
        let div = doc.select(&selector("div")).next().unwrap();
        assert_eq!(stripped_text(&div), "Hellobigworld");
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12,345"), Some(12_345));
        assert_eq!(parse_count(" 7 "), Some(7));
        assert_eq!(parse_count(",,,"), None);
        assert_eq!(parse_count("many"), None);
    }

    #[test]
    fn test_truncate_chars_is_char_based() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }
}
