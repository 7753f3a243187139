//! Mobilizon client configuration.

use std::time::Duration;
use url::Url;

/// Configuration for the Mobilizon GraphQL client.
#[derive(Debug, Clone)]
pub struct MobilizonConfig {
    /// Instance root, e.g. `https://mobilizon.fr`.
    pub base_url: Url,

    /// Deadline for one request, connection to last byte.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl MobilizonConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration for the instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(base_url.as_ref())?;
        Ok(Self {
            base_url: parsed,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The GraphQL endpoint: `<base_url>/api`.
    pub fn api_url(&self) -> String {
        api_url(self.base_url.as_str())
    }
}

/// Appends `/api` to an instance root, tolerating a trailing slash.
pub fn api_url(base_url: &str) -> String {
    format!("{}/api", base_url.trim_end_matches('/'))
}

/// `mobilizon-agenda/<version>`.
pub fn default_user_agent() -> String {
    format!("mobilizon-agenda/{}", env!("CARGO_PKG_VERSION"))
}
