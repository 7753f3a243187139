//! HTTP client for the Mobilizon GraphQL API.

use agenda_core::EventRecord;
use reqwest::Client;
use tracing::debug;

use crate::error::ProviderResult;
use crate::http::{build_client, read_body, request_error};
use crate::provider::{BoxFuture, EventSource, PaginationCursor};

use super::config::MobilizonConfig;
use super::query::{GraphQlRequest, decode_count, decode_page};

/// Mobilizon GraphQL client.
#[derive(Debug, Clone)]
pub struct MobilizonClient {
    http: Client,
    api_url: String,
}

impl MobilizonClient {
    /// Creates a client for the configured instance.
    pub fn new(config: MobilizonConfig) -> ProviderResult<Self> {
        let http = build_client(config.timeout, &config.user_agent)?;
        Ok(Self {
            http,
            api_url: config.api_url(),
        })
    }

    /// Returns the GraphQL endpoint.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// POSTs a GraphQL request and returns the raw body.
    async fn execute(&self, request: &GraphQlRequest) -> ProviderResult<Vec<u8>> {
        let response = self
            .http
            .post(&self.api_url)
            .json(request)
            .send()
            .await
            .map_err(|e| request_error(&self.api_url, e))?;

        read_body(&self.api_url, response).await
    }
}

impl EventSource for MobilizonClient {
    fn name(&self) -> &str {
        "mobilizon"
    }

    fn count_events<'a>(&'a self, group: &'a str) -> BoxFuture<'a, ProviderResult<u64>> {
        Box::pin(async move {
            let body = self
                .execute(&GraphQlRequest::count(group))
                .await
                .map_err(|e| e.with_provider("mobilizon"))?;
            let total = decode_count(&body, group).map_err(|e| e.with_provider("mobilizon"))?;
            debug!(group = %group, total, "Counted events");
            Ok(total)
        })
    }

    fn fetch_page<'a>(
        &'a self,
        cursor: &'a PaginationCursor,
    ) -> BoxFuture<'a, ProviderResult<Vec<EventRecord>>> {
        Box::pin(async move {
            let body = self
                .execute(&GraphQlRequest::page(cursor))
                .await
                .map_err(|e| e.with_provider("mobilizon"))?;
            let events =
                decode_page(&body, &cursor.group).map_err(|e| e.with_provider("mobilizon"))?;
            debug!(
                group = %cursor.group,
                page = cursor.page,
                count = events.len(),
                "Fetched page"
            );
            Ok(events)
        })
    }
}
