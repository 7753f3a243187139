//! Cache key derivation.
//!
//! Every remote asset (API response, image, ICS fragment) is stored under a
//! filesystem-safe key derived from its source URL. Runs of space, `:`, `/`,
//! `?` and `=` collapse into a single `_`.
//!
//! The mapping is lossy on purpose: two URLs that only differ inside those
//! runs share a key and therefore a cache file. Keys stay readable and stable
//! across runs, which matters because the key is also the public file name
//! of published thumbnails.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static URL_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ :/?=]+").expect("separator regex should be valid"));

static PAGE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[:/]+").expect("page separator regex should be valid"));

/// A filesystem-safe cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a remote URL.
    pub fn from_url(url: &str) -> Self {
        Self(URL_SEPARATORS.replace_all(url, "_").into_owned())
    }

    /// Derives the calendar feed key for an output page.
    ///
    /// One leading and one trailing `/` are dropped, so `/agenda/` becomes
    /// `agenda` and `/events/2024/` becomes `events_2024`. The site root maps
    /// to `index`.
    pub fn for_page(page_url: &str) -> Self {
        let trimmed = page_url.strip_prefix('/').unwrap_or(page_url);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Self("index".to_string());
        }
        Self(PAGE_SEPARATORS.replace_all(trimmed, "_").into_owned())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Joins site path segments and percent-encodes each one.
///
/// Separators between segments are kept, so the result can be embedded as
/// an `href`/`src` attribute.
///
/// ```
/// use agenda_core::cache_key::site_path;
///
/// assert_eq!(
///     site_path(&["assets/mobilizon", "media", "a b.png"]),
///     "assets/mobilizon/media/a%20b.png"
/// );
/// ```
pub fn site_path(segments: &[&str]) -> String {
    segments
        .iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|part| !part.is_empty())
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
