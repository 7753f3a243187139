//! Remote collaborator traits.
//!
//! - [`EventSource`]: the paginated event directory (Mobilizon GraphQL).
//! - [`Downloader`]: plain HTTP GET of images and ICS fragments.
//!
//! Both return boxed futures so they can be used as trait objects and
//! swapped for in-memory fakes in tests.

use std::future::Future;
use std::pin::Pin;

use agenda_core::{EventRecord, format_iso8601_centis};
use chrono::{DateTime, Utc};

use crate::error::ProviderResult;

/// Number of events per page of the `organizedEvents` connection.
pub const PAGE_SIZE: u64 = 10;

/// A boxed future for async trait methods.
///
/// Boxing keeps the traits object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Position of one page request within a crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCursor {
    /// Group handle.
    pub group: String,
    /// 1-based page number.
    pub page: u64,
    /// Only events starting at or after this instant are listed.
    pub after: DateTime<Utc>,
}

impl PaginationCursor {
    /// Creates a cursor for `page` of `group`.
    pub fn new(group: impl Into<String>, page: u64, after: DateTime<Utc>) -> Self {
        Self {
            group: group.into(),
            page,
            after,
        }
    }

    /// The `afterDatetime` query variable.
    pub fn after_param(&self) -> String {
        format_iso8601_centis(&self.after)
    }
}

/// Number of pages needed for `total` events.
pub fn page_count(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE)
}

/// A paginated directory of events, organized by group.
pub trait EventSource: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Returns the total number of events organized by `group`.
    fn count_events<'a>(&'a self, group: &'a str) -> BoxFuture<'a, ProviderResult<u64>>;

    /// Fetches one page of events.
    fn fetch_page<'a>(
        &'a self,
        cursor: &'a PaginationCursor,
    ) -> BoxFuture<'a, ProviderResult<Vec<EventRecord>>>;
}

/// Fetches the body of a URL.
pub trait Downloader: Send + Sync {
    /// Downloads `url`, following redirects. Non-success statuses are errors.
    fn download<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<Vec<u8>>>;
}
