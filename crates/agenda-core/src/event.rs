//! Event records as crawled from a Mobilizon instance.
//!
//! [`EventRecord`] is the typed shape of one element of the
//! `organizedEvents` GraphQL connection. Field names follow the API
//! (camelCase) so that the on-disk raw cache is the API payload verbatim.
//!
//! [`AgendaEvent`] is the render-scoped, normalized copy handed to the
//! template renderer. It is never cached.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Start or end of an event.
///
/// Mobilizon sends RFC 3339 instants; a bare `YYYY-MM-DD` date is accepted
/// too so that hand-edited caches and date-only feeds still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    /// A specific instant, keeping the offset it was published with.
    DateTime(DateTime<FixedOffset>),
    /// A calendar date without time of day.
    Date(NaiveDate),
}

impl EventTime {
    /// Returns the instant used for ordering.
    ///
    /// Dates sort at midnight UTC.
    pub fn sort_key(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime(dt) => dt.with_timezone(&Utc),
            Self::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// Returns the date as written, i.e. in the offset the instant carries.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::DateTime(dt) => dt.date_naive(),
            Self::Date(date) => *date,
        }
    }

    /// Returns `true` if this is a date without time of day.
    pub fn is_date_only(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

/// Display flags chosen by the event author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOptions {
    /// Whether the start time of day should be shown.
    pub show_start_time: bool,
    /// Whether the end time of day should be shown.
    pub show_end_time: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self {
            show_start_time: true,
            show_end_time: true,
        }
    }
}

/// A remote media reference (picture, avatar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
}

/// The group or person an event is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    /// Display name.
    pub name: Option<String>,
    /// Federated handle, e.g. `my_group`.
    pub preferred_username: String,
    /// Avatar image.
    pub avatar: Option<Media>,
}

/// Physical venue of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalAddress {
    pub locality: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
}

/// A tag attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One crawled event, as persisted in the raw request cache.
///
/// Identity is the canonical [`url`](Self::url).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub title: String,
    pub url: Option<String>,
    pub begins_on: EventTime,
    pub ends_on: Option<EventTime>,
    #[serde(default)]
    pub options: EventOptions,
    pub attributed_to: Option<Organizer>,
    pub description: Option<String>,
    pub online_address: Option<String>,
    pub physical_address: Option<PhysicalAddress>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub picture: Option<Media>,
}

impl EventRecord {
    /// Creates a record with the required fields and nothing else.
    pub fn new(title: impl Into<String>, begins_on: EventTime) -> Self {
        Self {
            title: title.into(),
            url: None,
            begins_on,
            ends_on: None,
            options: EventOptions::default(),
            attributed_to: None,
            description: None,
            online_address: None,
            physical_address: None,
            tags: Vec::new(),
            picture: None,
        }
    }

    /// Builder method to set the canonical URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder method to set the end.
    pub fn with_ends_on(mut self, ends_on: EventTime) -> Self {
        self.ends_on = Some(ends_on);
        self
    }

    /// Builder method to set the display flags.
    pub fn with_options(mut self, show_start_time: bool, show_end_time: bool) -> Self {
        self.options = EventOptions {
            show_start_time,
            show_end_time,
        };
        self
    }

    /// Builder method to set the organizer.
    pub fn with_organizer(mut self, organizer: Organizer) -> Self {
        self.attributed_to = Some(organizer);
        self
    }

    /// Builder method to add a tag.
    pub fn with_tag(mut self, title: impl Into<String>, slug: impl Into<String>) -> Self {
        self.tags.push(Tag {
            title: title.into(),
            slug: slug.into(),
            id: None,
        });
        self
    }

    /// Builder method to set the picture URL.
    pub fn with_picture(mut self, url: impl Into<String>) -> Self {
        self.picture = Some(Media { url: url.into() });
        self
    }

    /// Builder method to set the physical address.
    pub fn with_address(mut self, address: PhysicalAddress) -> Self {
        self.physical_address = Some(address);
        self
    }

    /// Returns the organizer handle, if attributed.
    pub fn organizer_handle(&self) -> Option<&str> {
        self.attributed_to
            .as_ref()
            .map(|o| o.preferred_username.as_str())
    }

    /// Returns the organizer avatar URL, if any.
    pub fn avatar_url(&self) -> Option<&str> {
        self.attributed_to
            .as_ref()
            .and_then(|o| o.avatar.as_ref())
            .map(|m| m.url.as_str())
    }

    /// Returns the picture URL, if any.
    pub fn picture_url(&self) -> Option<&str> {
        self.picture.as_ref().map(|m| m.url.as_str())
    }
}

/// A normalized event, ready for the template renderer.
///
/// Raw fields are carried over; times are replaced by their display form and
/// the derived fields are filled in where the source data allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEvent {
    /// 0-based position in the rendered list.
    pub index: usize,
    pub title: String,
    pub url: Option<String>,
    /// Display start: ISO 8601 in the site timezone, or `YYYY-MM-DD`.
    pub begins_on: String,
    /// Display end, same rules as `begins_on`.
    pub ends_on: Option<String>,
    pub options: EventOptions,
    pub attributed_to: Option<Organizer>,
    pub description: Option<String>,
    pub online_address: Option<String>,
    pub physical_address: Option<PhysicalAddress>,
    pub tags: Vec<Tag>,
    pub picture: Option<Media>,
    /// Site-relative path of the cached picture thumbnail.
    #[serde(rename = "thumbnailurl")]
    pub thumbnail_url: Option<String>,
    /// Human readable venue line.
    pub location: Option<String>,
    /// Site-relative path of the cached organizer avatar.
    pub organizer_avatar: Option<String>,
    /// Organizer display name.
    pub organizer: Option<String>,
    /// Link to the organizer's group page on the instance.
    pub group_url: Option<String>,
}
