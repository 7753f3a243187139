//! Paginated crawl of every configured group.
//!
//! For each group the total is fetched once, then pages `1..=ceil(total/10)`
//! are requested in order. A group with no events costs one request. All
//! page queries share the instant captured when the crawl starts, so a
//! crawl that straddles an event's start time still sees a consistent
//! listing.
//!
//! Any failure aborts the whole crawl; pages already fetched are dropped.

use agenda_core::EventRecord;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::ProviderResult;
use crate::provider::{EventSource, PaginationCursor, page_count};

/// Crawls an [`EventSource`] group by group.
pub struct EventCrawler<'a> {
    source: &'a dyn EventSource,
}

impl<'a> EventCrawler<'a> {
    /// Creates a crawler over `source`.
    pub fn new(source: &'a dyn EventSource) -> Self {
        Self { source }
    }

    /// Crawls `groups`, listing events that start from now on.
    pub async fn crawl(&self, groups: &[String]) -> ProviderResult<Vec<EventRecord>> {
        self.crawl_since(groups, Utc::now()).await
    }

    /// Crawls `groups`, listing events that start at or after `after`.
    ///
    /// Events are returned group by group, page by page, in API order.
    /// Duplicates across groups are kept.
    pub async fn crawl_since(
        &self,
        groups: &[String],
        after: DateTime<Utc>,
    ) -> ProviderResult<Vec<EventRecord>> {
        info!(source = self.source.name(), groups = groups.len(), "Crawling events");

        let mut events = Vec::new();
        for group in groups {
            let total = self.source.count_events(group).await?;
            if total == 0 {
                debug!(group = %group, "Group has no events, skipping");
                continue;
            }

            let pages = page_count(total);
            debug!(group = %group, total, pages, "Crawling group");
            for page in 1..=pages {
                let cursor = PaginationCursor::new(group.as_str(), page, after);
                events.extend(self.source.fetch_page(&cursor).await?);
            }
        }

        info!(count = events.len(), "Crawling ended");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderError, ProviderErrorCode};
    use crate::provider::BoxFuture;
    use agenda_core::EventTime;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory directory: each group has a total and a fixed list of
    /// events served ten at a time.
    #[derive(Default)]
    struct FakeSource {
        groups: HashMap<String, Vec<EventRecord>>,
        fail_on_page: Option<(String, u64)>,
        counts: Mutex<Vec<String>>,
        pages: Mutex<Vec<PaginationCursor>>,
    }

    impl FakeSource {
        fn with_group(mut self, group: &str, count: usize) -> Self {
            let start = EventTime::DateTime(
                Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap().fixed_offset(),
            );
            let events = (0..count)
                .map(|i| EventRecord::new(format!("{group}-{i}"), start.clone()))
                .collect();
            self.groups.insert(group.to_string(), events);
            self
        }

        fn page_requests(&self) -> Vec<PaginationCursor> {
            self.pages.lock().unwrap().clone()
        }
    }

    impl EventSource for FakeSource {
        fn name(&self) -> &str {
            "fake"
        }

        fn count_events<'a>(&'a self, group: &'a str) -> BoxFuture<'a, ProviderResult<u64>> {
            self.counts.lock().unwrap().push(group.to_string());
            let total = self.groups.get(group).map(|e| e.len() as u64);
            Box::pin(async move {
                total.ok_or_else(|| ProviderError::not_found(format!("group `{group}` not found")))
            })
        }

        fn fetch_page<'a>(
            &'a self,
            cursor: &'a PaginationCursor,
        ) -> BoxFuture<'a, ProviderResult<Vec<EventRecord>>> {
            self.pages.lock().unwrap().push(cursor.clone());
            let failing = self.fail_on_page.as_ref() == Some(&(cursor.group.clone(), cursor.page));
            let events: Vec<EventRecord> = self.groups[&cursor.group]
                .iter()
                .skip(((cursor.page - 1) * 10) as usize)
                .take(10)
                .cloned()
                .collect();
            Box::pin(async move {
                if failing {
                    Err(ProviderError::network("connection reset"))
                } else {
                    Ok(events)
                }
            })
        }
    }

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn requests_ceil_total_over_ten_pages() {
        let source = FakeSource::default().with_group("big", 23);
        let events = EventCrawler::new(&source)
            .crawl_since(&groups(&["big"]), fixed_now())
            .await
            .unwrap();

        assert_eq!(events.len(), 23);
        let pages: Vec<_> = source.page_requests().iter().map(|c| c.page).collect();
        assert_eq!(pages, [1, 2, 3]);
    }

    #[tokio::test]
    async fn exact_multiple_of_page_size() {
        let source = FakeSource::default().with_group("ten", 10);
        EventCrawler::new(&source)
            .crawl_since(&groups(&["ten"]), fixed_now())
            .await
            .unwrap();
        assert_eq!(source.page_requests().len(), 1);
    }

    #[tokio::test]
    async fn empty_group_fetches_no_page() {
        let source = FakeSource::default()
            .with_group("empty", 0)
            .with_group("small", 3);
        let events = EventCrawler::new(&source)
            .crawl_since(&groups(&["empty", "small"]), fixed_now())
            .await
            .unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(*source.counts.lock().unwrap(), ["empty", "small"]);
        let requested: Vec<_> = source
            .page_requests()
            .into_iter()
            .map(|c| c.group)
            .collect();
        assert_eq!(requested, ["small"]);
    }

    #[tokio::test]
    async fn all_pages_share_crawl_instant() {
        let source = FakeSource::default()
            .with_group("a", 15)
            .with_group("b", 12);
        EventCrawler::new(&source)
            .crawl_since(&groups(&["a", "b"]), fixed_now())
            .await
            .unwrap();

        let requests = source.page_requests();
        assert_eq!(requests.len(), 4);
        assert!(requests.iter().all(|c| c.after == fixed_now()));
    }

    #[tokio::test]
    async fn preserves_group_then_page_order_and_duplicates() {
        let source = FakeSource::default()
            .with_group("a", 12)
            .with_group("b", 1);
        let events = EventCrawler::new(&source)
            .crawl_since(&groups(&["b", "a", "b"]), fixed_now())
            .await
            .unwrap();

        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles.len(), 14);
        assert_eq!(titles[0], "b-0");
        assert_eq!(titles[1], "a-0");
        assert_eq!(titles[11], "a-10");
        assert_eq!(titles[12], "a-11");
        assert_eq!(titles[13], "b-0");
    }

    #[tokio::test]
    async fn page_failure_aborts_crawl() {
        let mut source = FakeSource::default()
            .with_group("a", 25)
            .with_group("b", 5);
        source.fail_on_page = Some(("a".to_string(), 2));

        let err = EventCrawler::new(&source)
            .crawl_since(&groups(&["a", "b"]), fixed_now())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ProviderErrorCode::NetworkError);
        // Nothing after the failing page is requested.
        assert_eq!(source.page_requests().len(), 2);
        assert_eq!(*source.counts.lock().unwrap(), ["a"]);
    }

    #[tokio::test]
    async fn unknown_group_is_fatal() {
        let source = FakeSource::default();
        let err = EventCrawler::new(&source)
            .crawl_since(&groups(&["ghost"]), fixed_now())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::NotFound);
    }
}
