//! Listing page extraction.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::{ensure_markup, selector, stripped_text, truncate_chars};
use crate::errors::Result;
use crate::model::{extract_id_from_path, Author, Model, SearchResult};

/// Card text longer than this is not taken as a title.
const CARD_TEXT_MAX_CHARS: usize = 100;

/// Length of a title taken from card text.
const CARD_TITLE_CHARS: usize = 50;

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static TITLE_CANDIDATE: LazyLock<Selector> =
    LazyLock::new(|| selector("h2, h3, h4, h5, h6, span, div"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));

#[allow(clippy::expect_used)]
static AUTHOR_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/member/|/user/|patreon").expect("author link regex is valid"));
#[allow(clippy::expect_used)]
static PAGE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]page=(\d+)").expect("page param regex is valid"));
#[allow(clippy::expect_used)]
static ACTIVE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"active|current").expect("active class regex is valid"));

fn href<'a>(anchor: &ElementRef<'a>) -> &'a str {
    anchor.value().attr("href").unwrap_or_default()
}

fn page_number(href: &str) -> Option<u32> {
    PAGE_PARAM.captures(href).and_then(|caps| caps[1].parse().ok())
}

/// Title of a card: its first heading or text container, else its own text.
fn card_title(card: &ElementRef<'_>) -> Option<String> {
    if let Some(candidate) = card.select(&TITLE_CANDIDATE).next() {
        let text = stripped_text(&candidate);
        if text.chars().count() > 2 {
            return Some(text);
        }
    }

    let text = stripped_text(card);
    (!text.is_empty() && text.chars().count() < CARD_TEXT_MAX_CHARS)
        .then(|| truncate_chars(&text, CARD_TITLE_CHARS))
}

/// First image source of a card, lazy-loaded or not.
fn card_thumbnail(card: &ElementRef<'_>) -> Option<String> {
    let img = card.select(&IMG).next()?;
    ["src", "data-src"]
        .into_iter()
        .filter_map(|attr| img.value().attr(attr))
        .find(|src| !src.is_empty())
        .map(String::from)
}

/// The first member/user/patreon link after a card, in document order.
fn following_author(following: &[ElementRef<'_>]) -> Option<Author> {
    let link = following.iter().find(|a| AUTHOR_LINK.is_match(href(a)))?;
    let name = stripped_text(link);
    if name.is_empty() {
        return None;
    }
    Some(Author::new(name, href(link)))
}

/// Highest page number linked from the page.
fn total_pages(anchors: &[ElementRef<'_>]) -> u32 {
    anchors
        .iter()
        .filter_map(|a| page_number(href(a)))
        .max()
        .unwrap_or(1)
        .max(1)
}

/// Page number of the first anchor marked active/current.
fn active_page(anchors: &[ElementRef<'_>]) -> Option<u32> {
    let active = anchors
        .iter()
        .find(|a| a.value().classes().any(|class| ACTIVE_CLASS.is_match(class)))?;
    page_number(href(active))
}

/// Parses a search/listing page.
///
/// Model links are deduplicated by ID, keeping the first occurrence, so the
/// site's ranking order is preserved. `requested_page` is used as the current
/// page when no pagination link is marked active.
pub fn parse_search_results(html: &str, requested_page: u32) -> Result<SearchResult> {
    ensure_markup(html)?;
    let document = Html::parse_document(html);
    let anchors: Vec<ElementRef<'_>> = document.select(&ANCHOR).collect();

    let mut seen = HashSet::new();
    let mut models = Vec::new();

    for (index, card) in anchors.iter().enumerate() {
        let Some(id) = extract_id_from_path(href(card)) else {
            continue;
        };
        if !seen.insert(id.clone()) {
            continue;
        }

        let mut model = Model::from_id(&id)?;
        if let Some(title) = card_title(card) {
            model.title = title;
        }
        if let Some(thumbnail) = card_thumbnail(card) {
            model.thumbnail = thumbnail;
        }
        model.author = following_author(&anchors[index + 1..]);
        models.push(model);
    }

    let result = SearchResult {
        models,
        total_pages: total_pages(&anchors),
        current_page: active_page(&anchors).unwrap_or_else(|| requested_page.max(1)),
        query: String::new(),
    };

    tracing::debug!(
        models = result.models.len(),
        total_pages = result.total_pages,
        current_page = result.current_page,
        "Parsed listing page"
    );

    Ok(result)
}
