//! GraphQL documents and response decoding for the Mobilizon API.
//!
//! Decoding is where raw payloads become typed [`EventRecord`]s: a page with
//! a malformed element is rejected as a whole.

use agenda_core::EventRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::PaginationCursor;

/// Total number of events organized by a group.
pub const COUNT_QUERY: &str = r#"query($group: String!) {
  group(preferredUsername: $group) {
    organizedEvents {
      total
    }
  }
}"#;

/// One page of events organized by a group.
pub const PAGE_QUERY: &str = r#"query($page: Int, $group: String!, $afterDatetime: DateTime) {
  group(preferredUsername: $group) {
    organizedEvents(page: $page, afterDatetime: $afterDatetime) {
      elements {
        title
        url
        beginsOn
        endsOn
        options {
          showStartTime
          showEndTime
        }
        attributedTo {
          avatar {
            url
          }
          name
          preferredUsername
        }
        description
        onlineAddress
        physicalAddress {
          locality
          description
          region
        }
        tags {
          title
          id
          slug
        }
        picture {
          url
        }
      }
    }
  }
}"#;

/// A GraphQL request body.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub variables: Value,
}

impl GraphQlRequest {
    /// The count request for `group`.
    pub fn count(group: &str) -> Self {
        Self {
            query: COUNT_QUERY,
            variables: json!({ "group": group }),
        }
    }

    /// The page request for `cursor`.
    pub fn page(cursor: &PaginationCursor) -> Self {
        Self {
            query: PAGE_QUERY,
            variables: json!({
                "page": cursor.page,
                "group": cursor.group,
                "afterDatetime": cursor.after_param(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GroupData<T> {
    group: Option<GroupEvents<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupEvents<T> {
    organized_events: T,
}

#[derive(Debug, Deserialize)]
struct Total {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct Elements {
    elements: Vec<EventRecord>,
}

/// Unwraps `data.group.organizedEvents` from a response body.
fn decode_group<T: DeserializeOwned>(body: &[u8], group: &str) -> ProviderResult<T> {
    let response: GraphQlResponse<GroupData<T>> = serde_json::from_slice(body).map_err(|e| {
        ProviderError::invalid_response(format!("failed to parse response: {}", e)).with_source(e)
    })?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(ProviderError::invalid_response(format!(
            "API error: {}",
            messages.join("; ")
        )));
    }

    response
        .data
        .and_then(|data| data.group)
        .map(|g| g.organized_events)
        .ok_or_else(|| ProviderError::not_found(format!("group `{}` not found", group)))
}

/// Decodes a count response.
pub fn decode_count(body: &[u8], group: &str) -> ProviderResult<u64> {
    decode_group::<Total>(body, group).map(|t| t.total)
}

/// Decodes a page response into typed records, in API order.
pub fn decode_page(body: &[u8], group: &str) -> ProviderResult<Vec<EventRecord>> {
    decode_group::<Elements>(body, group).map(|e| e.elements)
}
