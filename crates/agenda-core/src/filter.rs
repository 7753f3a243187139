//! Allow-list filtering and ordering of crawled events.

use crate::event::EventRecord;

/// The set of organizer handles, tag slugs and tag titles a page wants.
///
/// Built from a comma-separated list; tokens are trimmed and lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    tokens: Vec<String>,
}

impl AllowList {
    /// Parses a comma-separated list such as `"music, Art,les_bricoleurs"`.
    ///
    /// Empty tokens are dropped.
    pub fn parse(list: &str) -> Self {
        let tokens = list
            .split(',')
            .map(|token| token.trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .collect();
        Self { tokens }
    }

    /// Returns true if the token is in the list.
    ///
    /// The token is compared as given; callers fold case where the source
    /// field is case-insensitive.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Returns true if the event should be shown.
    ///
    /// An event matches when its organizer handle is listed, or when any tag
    /// slug or tag title, lowercased, is listed.
    pub fn matches(&self, event: &EventRecord) -> bool {
        if event.organizer_handle().is_some_and(|h| self.contains(h)) {
            return true;
        }
        event.tags.iter().any(|tag| {
            self.contains(&tag.slug.to_lowercase()) || self.contains(&tag.title.to_lowercase())
        })
    }

    /// Returns the number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if nothing is allowed.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Keeps the events matching the allow-list, preserving order.
pub fn filter_events(events: Vec<EventRecord>, allow: &AllowList) -> Vec<EventRecord> {
    events.into_iter().filter(|e| allow.matches(e)).collect()
}

/// Stable ascending sort by start instant.
pub fn sort_events(events: &mut [EventRecord]) {
    events.sort_by_key(|e| e.begins_on.sort_key());
}
