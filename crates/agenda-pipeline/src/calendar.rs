//! Merged iCalendar feed per agenda page.
//!
//! Each event page on the instance exports a one-event calendar at
//! `<event url>/export/ics`. These fragments are cached in `_ics/` and their
//! `VEVENT`s are merged, in agenda order, into `calendar/<page key>.ics`,
//! together with a fixed `Europe/Paris` timezone definition.
//!
//! A feed is written once per page key and never rebuilt.

use agenda_core::{CacheKey, EventRecord};
use agenda_providers::Downloader;
use icalendar::{Calendar, CalendarComponent, Event};
use tracing::{debug, info};

use crate::assets::{StaticAssets, site_dir};
use crate::cache::{AssetCache, Namespace};
use crate::error::{PipelineError, PipelineResult};

/// Europe/Paris rules: CEST from the last Sunday of March, CET from the last
/// Sunday of October.
pub const EUROPE_PARIS_VTIMEZONE: &str = "BEGIN:VTIMEZONE\r\n\
TZID:Europe/Paris\r\n\
BEGIN:DAYLIGHT\r\n\
DTSTART:19700329T020000\r\n\
TZOFFSETFROM:+0100\r\n\
TZOFFSETTO:+0200\r\n\
TZNAME:CEST\r\n\
RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU\r\n\
END:DAYLIGHT\r\n\
BEGIN:STANDARD\r\n\
DTSTART:19701025T030000\r\n\
TZOFFSETFROM:+0200\r\n\
TZOFFSETTO:+0100\r\n\
TZNAME:CET\r\n\
RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU\r\n\
END:STANDARD\r\n\
END:VTIMEZONE\r\n";

/// Suffix of the per-event export endpoint.
const EXPORT_SUFFIX: &str = "/export/ics";

/// File name of the feed for a page.
pub fn feed_name(page_url: &str) -> String {
    format!("{}.ics", CacheKey::for_page(page_url))
}

/// Extracts the single `VEVENT` of a fragment.
pub fn parse_fragment(ics: &str, source: &str) -> PipelineResult<Event> {
    let calendar: Calendar = ics
        .parse()
        .map_err(|e: String| PipelineError::calendar(format!("{}: {}", source, e)))?;

    let mut events: Vec<Event> = calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => Some(event.clone()),
            _ => None,
        })
        .collect();

    match events.len() {
        1 => Ok(events.remove(0)),
        n => Err(PipelineError::calendar(format!(
            "{}: expected exactly one event, found {}",
            source, n
        ))),
    }
}

/// Places the timezone block ahead of the first component.
fn insert_timezone(ics: &str) -> String {
    let at = ics
        .find("\r\nBEGIN:")
        .map(|i| i + 2)
        .or_else(|| ics.rfind("END:VCALENDAR"))
        .unwrap_or(ics.len());

    let mut out = String::with_capacity(ics.len() + EUROPE_PARIS_VTIMEZONE.len());
    out.push_str(&ics[..at]);
    out.push_str(EUROPE_PARIS_VTIMEZONE);
    out.push_str(&ics[at..]);
    out
}

/// Builds merged feeds.
pub struct CalendarAssembler<'a> {
    cache: &'a AssetCache,
    downloader: &'a dyn Downloader,
    cache_dir: &'a str,
}

impl<'a> CalendarAssembler<'a> {
    /// `cache_dir` is the site-relative cache directory used when registering
    /// the published feed.
    pub fn new(cache: &'a AssetCache, downloader: &'a dyn Downloader, cache_dir: &'a str) -> Self {
        Self {
            cache,
            downloader,
            cache_dir,
        }
    }

    /// Writes the feed for `page_url` unless it already exists.
    ///
    /// Events without a URL are left out. Nothing is written if any fragment
    /// fails. Returns whether a feed was written.
    pub async fn assemble(
        &self,
        events: &[EventRecord],
        page_url: &str,
        assets: &mut StaticAssets,
    ) -> PipelineResult<bool> {
        let name = feed_name(page_url);
        if self.cache.exists(Namespace::Calendar, &name) {
            debug!(page = %page_url, feed = %name, "Calendar already built");
            return Ok(false);
        }

        info!(page = %page_url, "Creating icalendar");
        let mut calendar = Calendar::new();
        for url in events.iter().filter_map(|e| e.url.as_deref()) {
            let fragment = self.fragment(&format!("{}{}", url, EXPORT_SUFFIX)).await?;
            calendar.push(fragment);
        }

        let ics = insert_timezone(&calendar.to_string());
        self.cache.put(Namespace::Calendar, &name, ics.as_bytes())?;
        assets.register(site_dir(self.cache_dir, Namespace::Calendar.dir_name()), name);
        Ok(true)
    }

    /// Loads a fragment from `_ics/`, downloading it on miss.
    async fn fragment(&self, url: &str) -> PipelineResult<Event> {
        let key = CacheKey::from_url(url);
        let bytes = match self.cache.get(Namespace::Ics, &key)? {
            Some(bytes) => bytes,
            None => {
                info!(url = %url, "Fetching ics");
                let bytes = self.downloader.download(url).await?;
                self.cache.put(Namespace::Ics, &key, &bytes)?;
                bytes
            }
        };

        let text = String::from_utf8(bytes)
            .map_err(|e| PipelineError::calendar(format!("{}: {}", url, e)))?;
        parse_fragment(&text, url)
    }
}
