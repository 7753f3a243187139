//! Tracing setup shared by the agenda crates.
//!
//! Site builds want terse progress lines on stderr; CI runs and debugging
//! sessions may want JSON or source locations. [`TracingConfig`] covers
//! those cases and [`init_tracing`] installs the global subscriber.
//!
//! ```ignore
//! use agenda_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::build_log())?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Crate targets enabled by the default filter.
pub const AGENDA_TARGETS: &[&str] = &[
    "agenda_core",
    "agenda_providers",
    "agenda_pipeline",
    "agenda_client",
];

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// A global subscriber is already installed.
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// The filter directive could not be parsed.
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Multi-line human readable output.
    Pretty,
    /// One line per event (default).
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Configuration for [`init_tracing`].
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level applied to the agenda crates when `RUST_LOG` is unset.
    pub default_level: Level,
    pub output_format: TracingOutputFormat,
    /// Include file and line.
    pub include_location: bool,
    /// Include the module path.
    pub include_target: bool,
    pub include_timestamp: bool,
    /// Log span open/close.
    pub include_span_events: bool,
    /// Explicit filter directive; takes precedence over `RUST_LOG`.
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Compact,
            include_location: false,
            include_target: false,
            include_timestamp: true,
            include_span_events: false,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Progress lines for a site build: warnings and above, no timestamps.
    #[must_use]
    pub fn build_log() -> Self {
        Self {
            default_level: Level::WARN,
            include_timestamp: false,
            ..Self::default()
        }
    }

    /// Verbose output with source locations.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_location: true,
            include_target: true,
            ..Self::default()
        }
    }

    /// Structured output for log collectors.
    #[must_use]
    pub fn json() -> Self {
        Self {
            output_format: TracingOutputFormat::Json,
            include_target: true,
            include_span_events: true,
            ..Self::default()
        }
    }

    /// Set the default log level
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set a custom env filter directive
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// The directive used when neither `env_filter` nor `RUST_LOG` is set.
    pub fn default_directive(&self) -> String {
        let level = self.default_level.as_str().to_lowercase();
        AGENDA_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Installs the global subscriber, logging to stderr.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the directive is invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = match config.env_filter {
        Some(ref filter) => EnvFilter::try_new(filter)?,
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config.default_directive()))?,
    };

    let span_events = if config.include_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_target(config.include_target)
        .with_span_events(span_events);

    let layer = match (config.output_format, config.include_timestamp) {
        (TracingOutputFormat::Pretty, _) => base.pretty().boxed(),
        (TracingOutputFormat::Compact, true) => base.compact().boxed(),
        (TracingOutputFormat::Compact, false) => base.compact().without_time().boxed(),
        (TracingOutputFormat::Json, _) => base.json().boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(env_filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
