//! Remote collaborators for the agenda.
//!
//! This crate talks to the outside world:
//!
//! - [`EventSource`] - The paginated event directory, implemented by [`MobilizonClient`]
//! - [`Downloader`] - Plain GET of images and calendar fragments, implemented by [`HttpDownloader`]
//! - [`EventCrawler`] - Walks every group page by page
//! - [`ProviderError`] - Error types for remote operations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  Mobilizon GraphQL   │
//! └──────────┬───────────┘
//!            │ count + pages
//!            ▼
//! ┌──────────────────────┐      ┌──────────────────┐
//! │   MobilizonClient    │      │  HttpDownloader  │
//! └──────────┬───────────┘      └────────┬─────────┘
//!            │ EventSource               │ Downloader
//!            ▼                           ▼
//! ┌──────────────────────┐      images, /export/ics
//! │    EventCrawler      │
//! └──────────┬───────────┘
//!            ▼
//!     Vec<EventRecord>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use agenda_providers::{EventCrawler, MobilizonClient, MobilizonConfig};
//!
//! let client = MobilizonClient::new(MobilizonConfig::new("https://mobilizon.fr")?)?;
//! let events = EventCrawler::new(&client).crawl(&groups).await?;
//! ```

pub mod crawler;
pub mod error;
#[cfg(feature = "http")]
mod http;
pub mod mobilizon;
pub mod provider;

pub use crawler::EventCrawler;
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
#[cfg(feature = "http")]
pub use http::HttpDownloader;
#[cfg(feature = "http")]
pub use mobilizon::MobilizonClient;
pub use mobilizon::{MobilizonConfig, api_url, default_user_agent};
pub use provider::{BoxFuture, Downloader, EventSource, PAGE_SIZE, PaginationCursor, page_count};
