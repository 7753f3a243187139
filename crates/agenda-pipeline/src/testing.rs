//! In-memory collaborators for tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use agenda_core::EventRecord;
use agenda_providers::{
    BoxFuture, Downloader, EventSource, PAGE_SIZE, PaginationCursor, ProviderError,
    ProviderResult,
};
use image::{DynamicImage, ImageFormat, RgbImage};

/// PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Png)
}

/// Solid image of the given size, encoded as `format`.
pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

/// Minimal calendar fragment with one event.
pub fn ics_fragment(uid: &str, summary: &str) -> String {
    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Mobilizon//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:20240401T080000Z\r\n\
         DTSTART:20240501T120000Z\r\n\
         DTEND:20240501T150000Z\r\n\
         SUMMARY:{summary}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}

/// Serves canned bodies and records every request. Clones share state.
#[derive(Clone, Default)]
pub struct FakeDownloader {
    responses: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Downloader for FakeDownloader {
    fn download<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<Vec<u8>>> {
        self.requests.lock().unwrap().push(url.to_string());
        let body = self.responses.lock().unwrap().get(url).cloned();
        Box::pin(async move {
            body.ok_or_else(|| ProviderError::not_found(format!("{} not found", url)))
        })
    }
}

/// Groups with fixed event lists, paged like the real API.
#[derive(Clone, Default)]
pub struct FakeSource {
    groups: Arc<HashMap<String, Vec<EventRecord>>>,
    calls: Arc<Mutex<usize>>,
}

impl FakeSource {
    pub fn new(groups: impl IntoIterator<Item = (&'static str, Vec<EventRecord>)>) -> Self {
        Self {
            groups: Arc::new(
                groups
                    .into_iter()
                    .map(|(name, events)| (name.to_string(), events))
                    .collect(),
            ),
            calls: Arc::default(),
        }
    }

    /// Number of count and page queries served.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl EventSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    fn count_events<'a>(&'a self, group: &'a str) -> BoxFuture<'a, ProviderResult<u64>> {
        *self.calls.lock().unwrap() += 1;
        Box::pin(async move {
            self.groups
                .get(group)
                .map(|events| events.len() as u64)
                .ok_or_else(|| ProviderError::not_found(format!("group `{}` not found", group)))
        })
    }

    fn fetch_page<'a>(
        &'a self,
        cursor: &'a PaginationCursor,
    ) -> BoxFuture<'a, ProviderResult<Vec<EventRecord>>> {
        *self.calls.lock().unwrap() += 1;
        Box::pin(async move {
            let events = self.groups.get(&cursor.group).ok_or_else(|| {
                ProviderError::not_found(format!("group `{}` not found", cursor.group))
            })?;
            Ok(events
                .iter()
                .skip(((cursor.page - 1) * PAGE_SIZE) as usize)
                .take(PAGE_SIZE as usize)
                .cloned()
                .collect())
        })
    }
}
