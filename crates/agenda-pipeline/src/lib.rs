//! Agenda pipeline: disk cache, thumbnails, calendar feeds, rendering.
//!
//! This crate ties the crawler to the site:
//! - On-disk asset cache, one directory per namespace
//! - Thumbnails for event pictures and organizer avatars
//! - One merged iCalendar feed per agenda page
//! - Filtering, sorting and normalization of events for the renderer
//!
//! # Example
//!
//! ```rust,no_run
//! use agenda_core::RenderContext;
//! use agenda_pipeline::{EventPipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::new("https://mobilizon.fr")
//!         .with_groups(["bricoleurs"])
//!         .with_enabled(true);
//!     let mut pipeline = EventPipeline::from_config(config)?;
//!
//!     let html = pipeline
//!         .render("bricoleurs", "/agenda/", &mut |ctx: &RenderContext| {
//!             ctx.event.as_ref().map(|e| e.title.clone()).unwrap_or_default()
//!         })
//!         .await?;
//!     println!("{html}");
//!     Ok(())
//! }
//! ```

mod assets;
mod cache;
mod calendar;
mod config;
mod error;
mod normalize;
mod pipeline;
mod thumbnail;

#[cfg(test)]
mod testing;

pub use assets::{StaticAsset, StaticAssets};
pub use cache::{AssetCache, Namespace};
pub use calendar::{CalendarAssembler, EUROPE_PARIS_VTIMEZONE, feed_name, parse_fragment};
pub use config::{DEFAULT_CACHE_DIR, PipelineConfig};
pub use error::{PipelineError, PipelineResult};
pub use normalize::{Normalizer, location};
pub use pipeline::EventPipeline;
pub use thumbnail::{THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH, ThumbnailService, fill_dimensions, make_thumbnail};
