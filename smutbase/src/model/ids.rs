//! Model ID and URL normalization.
//!
//! Site IDs are UUIDs, but links on the site are not always written in the
//! same shape. Resolution tries progressively looser tiers:
//!
//! 1. the whole trimmed input is a hyphenated UUID;
//! 2. a hyphenated UUID follows `/project/` anywhere in the input;
//! 3. any `/project/<segment>/` whose segment parses as a UUID in another
//!    textual form (simple, braced, urn, mixed case).
//!
//! Every tier yields the lowercase hyphenated form.

use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::consts::{MODEL_PATH, ROOT_URL};
use crate::errors::{Result, SiteError};

#[allow(clippy::expect_used)]
static STRICT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("strict id regex is valid")
});

#[allow(clippy::expect_used)]
static PROJECT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/project/([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})")
        .expect("project id regex is valid")
});

#[allow(clippy::expect_used)]
static PROJECT_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/project/([^/?#]+)/").expect("project segment regex is valid"));

/// Tier 1: the input is itself a UUID.
fn strict_id(input: &str) -> Option<String> {
    STRICT_ID
        .is_match(input)
        .then(|| input.to_ascii_lowercase())
}

/// Tier 2: a hyphenated UUID after `/project/`.
fn project_id(input: &str) -> Option<String> {
    PROJECT_ID
        .captures(input)
        .map(|caps| caps[1].to_ascii_lowercase())
}

/// Tier 3: any `/project/<segment>/` that still parses as a UUID.
fn loose_project_id(input: &str) -> Option<String> {
    PROJECT_SEGMENT.captures_iter(input).find_map(|caps| {
        Uuid::parse_str(&caps[1])
            .ok()
            .map(|id| id.hyphenated().to_string())
    })
}

/// Extracts a model ID from text that contains a project path.
///
/// Only tiers 2 and 3 are tried, so a bare UUID is not accepted here.
#[must_use]
pub fn extract_id_from_path(input: &str) -> Option<String> {
    project_id(input).or_else(|| loose_project_id(input))
}

/// Resolves a bare ID, a URL, or a path to a canonical model ID.
pub fn normalize_model_id(input: &str) -> Result<String> {
    let trimmed = input.trim();
    strict_id(trimmed)
        .or_else(|| extract_id_from_path(trimmed))
        .ok_or_else(|| SiteError::invalid_model_id(trimmed))
}

/// The canonical absolute URL of a model.
#[must_use]
pub fn canonical_url(id: &str) -> String {
    format!("{ROOT_URL}{MODEL_PATH}{id}/")
}

/// Resolves a site-relative path against the root.
///
/// Absolute URLs pass through untouched, protocol-relative URLs get `https:`,
/// and an empty input stays empty.
#[must_use]
pub fn absolutize(url: &str) -> String {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else if url.starts_with('/') {
        format!("{ROOT_URL}{url}")
    } else {
        format!("{ROOT_URL}/{url}")
    }
}
