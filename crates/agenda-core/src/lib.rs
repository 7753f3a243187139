//! Core types: event records, cache keys, display time, filters, render contexts

pub mod cache_key;
pub mod event;
pub mod filter;
pub mod render;
pub mod time;
pub mod tracing;

pub use cache_key::{CacheKey, site_path};
pub use event::{
    AgendaEvent, EventOptions, EventRecord, EventTime, Media, Organizer, PhysicalAddress, Tag,
};
pub use filter::{AllowList, filter_events, sort_events};
pub use render::{ForLoop, RenderContext, Renderer, render_all, render_contexts};
pub use time::{DEFAULT_TIMEZONE, TimeError, display_time, format_iso8601_centis, parse_timezone};
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
