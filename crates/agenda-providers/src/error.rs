//! Error types for remote operations.
//!
//! Every error here is fatal to the operation that raised it: the crawler
//! and downloaders never retry, and callers abort the current render.

use std::fmt;
use thiserror::Error;

/// What went wrong while talking to a Mobilizon instance or a media host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorCode {
    /// Connection failed, timed out, or the body could not be read.
    NetworkError,
    /// HTTP 429.
    RateLimited,
    /// Server returned a 5xx status.
    ServerError,
    /// Unexpected status, unparseable payload, or a GraphQL `errors` array.
    InvalidResponse,
    /// Group or resource does not exist (404, or a `null` group).
    NotFound,
    /// Bad base URL or HTTP client setup.
    ConfigurationError,
}

impl ProviderErrorCode {
    /// Stable snake_case name, used in messages and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed request, tagged with the component that issued it.
#[derive(Debug, Error)]
#[error("{}{code}: {message}", origin_prefix(.origin))]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// "mobilizon" for GraphQL calls, "http" for plain downloads.
    origin: Option<&'static str>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

fn origin_prefix(origin: &Option<&'static str>) -> String {
    origin.map(|o| format!("[{}] ", o)).unwrap_or_default()
}

impl ProviderError {
    fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            origin: None,
            source: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::RateLimited, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Tags the error with the component that raised it.
    pub fn with_provider(mut self, origin: &'static str) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Attaches the underlying error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of a remote operation.
pub type ProviderResult<T> = Result<T, ProviderError>;
