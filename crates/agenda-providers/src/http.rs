//! HTTP plumbing shared by the Mobilizon client and the asset downloader.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, trace, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::mobilizon::default_user_agent;
use crate::provider::{BoxFuture, Downloader};

/// Builds a client with a fixed deadline per request.
pub(crate) fn build_client(timeout: Duration, user_agent: &str) -> ProviderResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| {
            ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                .with_source(e)
        })
}

/// Maps transport failures to provider errors.
pub(crate) fn request_error(url: &str, e: reqwest::Error) -> ProviderError {
    let message = if e.is_timeout() {
        format!("request to {} timed out", url)
    } else if e.is_connect() {
        format!("connection to {} failed: {}", url, e)
    } else {
        format!("request to {} failed: {}", url, e)
    };
    ProviderError::network(message).with_source(e)
}

/// Returns the body of a successful response, or the matching error.
pub(crate) async fn read_body(url: &str, response: Response) -> ProviderResult<Vec<u8>> {
    let status = response.status();
    trace!(url = %url, status = %status, "Received response");

    match status {
        s if s.is_success() => response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::network(format!("failed to read {}: {}", url, e))),
        StatusCode::NOT_FOUND => Err(ProviderError::not_found(format!("{} not found", url))),
        StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::rate_limited(format!(
            "too many requests to {}",
            url
        ))),
        s if s.is_server_error() => {
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::server(format!(
                "server error ({}) for {}: {}",
                s, url, body
            )))
        }
        s => {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %s, url = %url, "Unexpected response status");
            Err(ProviderError::invalid_response(format!(
                "unexpected status {} for {}: {}",
                s, url, body
            )))
        }
    }
}

/// Downloads images and calendar fragments over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a downloader with the given per-request deadline.
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        Self::with_user_agent(timeout, &default_user_agent())
    }

    /// Creates a downloader with a custom user agent.
    pub fn with_user_agent(timeout: Duration, user_agent: &str) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(timeout, user_agent)?,
        })
    }
}

impl Downloader for HttpDownloader {
    fn download<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<Vec<u8>>> {
        Box::pin(async move {
            debug!(url = %url, "Downloading");
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| request_error(url, e))?;
            read_body(url, response)
                .await
                .map_err(|e| e.with_provider("http"))
        })
    }
}
