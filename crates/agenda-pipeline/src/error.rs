//! Pipeline error types.

use std::io;
use std::path::{Path, PathBuf};

use agenda_core::TimeError;
use agenda_providers::ProviderError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort a render.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Filesystem error under the cache directory.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A cached JSON document no longer parses.
    #[error("Corrupt cache file {}: {source}", path.display())]
    CorruptCache {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Crawl or download failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Image could not be decoded or re-encoded.
    #[error("Image error for {url}: {source}")]
    Image {
        url: String,
        #[source]
        source: image::ImageError,
    },

    /// Calendar fragment could not be used.
    #[error("Calendar error: {message}")]
    Calendar { message: String },

    /// Display timezone is not a known IANA name.
    #[error("Unknown timezone: {name}")]
    Timezone { name: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PipelineError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a corrupt cache error for `path`.
    pub fn corrupt_cache(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::CorruptCache {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates an image error.
    pub fn image(url: impl Into<String>, source: image::ImageError) -> Self {
        Self::Image {
            url: url.into(),
            source,
        }
    }

    /// Creates a calendar error.
    pub fn calendar(message: impl Into<String>) -> Self {
        Self::Calendar {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<TimeError> for PipelineError {
    fn from(err: TimeError) -> Self {
        match err {
            TimeError::UnknownTimezone(name) => Self::Timezone { name },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_path() {
        let err = PipelineError::io(
            "/tmp/cache/_requests/x",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/cache/_requests/x"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn provider_error_is_transparent() {
        let err: PipelineError = ProviderError::network("connection refused").into();
        assert_eq!(err.to_string(), "network_error: connection refused");
    }

    #[test]
    fn timezone_from_time_error() {
        let err: PipelineError = TimeError::UnknownTimezone("Mars/Olympus".into()).into();
        assert!(matches!(err, PipelineError::Timezone { ref name } if name == "Mars/Olympus"));
    }
}
