//! Turns cached event records into render-ready events.

use agenda_core::{AgendaEvent, CacheKey, EventRecord, PhysicalAddress, display_time, site_path};
use chrono_tz::Tz;

use crate::cache::Namespace;

/// Per-render settings for normalization.
#[derive(Debug, Clone)]
pub struct Normalizer<'a> {
    timezone: Tz,
    cache_dir: &'a str,
    base_url: &'a str,
}

impl<'a> Normalizer<'a> {
    pub fn new(timezone: Tz, cache_dir: &'a str, base_url: &'a str) -> Self {
        Self {
            timezone,
            cache_dir,
            base_url,
        }
    }

    /// Normalizes the event at 0-based position `index`.
    pub fn normalize(&self, record: EventRecord, index: usize) -> AgendaEvent {
        let begins_on = display_time(
            &record.begins_on,
            record.options.show_start_time,
            &self.timezone,
        );
        let ends_on = record
            .ends_on
            .as_ref()
            .map(|t| display_time(t, record.options.show_end_time, &self.timezone));

        let thumbnail_url = record.picture_url().map(|url| self.media_path(url));
        let organizer_avatar = record.avatar_url().map(|url| self.media_path(url));
        let location = record.physical_address.as_ref().and_then(location);

        let (organizer, group_url) = match record.attributed_to.as_ref() {
            Some(org) => match org.name.as_ref() {
                Some(name) => (
                    Some(name.clone()),
                    Some(format!(
                        "{}/@{}",
                        self.base_url.trim_end_matches('/'),
                        org.preferred_username
                    )),
                ),
                None => (None, None),
            },
            None => (None, None),
        };

        AgendaEvent {
            index,
            title: record.title,
            url: record.url,
            begins_on,
            ends_on,
            options: record.options,
            attributed_to: record.attributed_to,
            description: record.description,
            online_address: record.online_address,
            physical_address: record.physical_address,
            tags: record.tags,
            picture: record.picture,
            thumbnail_url,
            location,
            organizer_avatar,
            organizer,
            group_url,
        }
    }

    /// Normalizes a sorted list, numbering from 0.
    pub fn normalize_all(&self, records: Vec<EventRecord>) -> Vec<AgendaEvent> {
        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| self.normalize(record, index))
            .collect()
    }

    /// Site path of the cached thumbnail for `url`.
    fn media_path(&self, url: &str) -> String {
        let key = CacheKey::from_url(url);
        site_path(&[self.cache_dir, Namespace::Media.dir_name(), key.as_str()])
    }
}

/// Venue line: `description, locality, region`, without the description when
/// it repeats the locality. Needs a locality; other missing parts are omitted.
pub fn location(address: &PhysicalAddress) -> Option<String> {
    let locality = address.locality.as_deref()?;
    let description = address
        .description
        .as_deref()
        .filter(|d| !d.is_empty() && *d != locality);

    let parts: Vec<&str> = description
        .into_iter()
        .chain(Some(locality))
        .chain(address.region.as_deref())
        .collect();
    Some(parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::{EventTime, Media, Organizer};

    fn time(s: &str) -> EventTime {
        serde_json::from_value(serde_json::Value::String(s.to_string())).unwrap()
    }

    fn normalizer() -> Normalizer<'static> {
        Normalizer::new(
            chrono_tz::Europe::Paris,
            "assets/mobilizon",
            "https://mobilizon.example",
        )
    }

    fn organizer(name: Option<&str>, avatar: Option<&str>) -> Organizer {
        Organizer {
            name: name.map(str::to_string),
            preferred_username: "bricoleurs".to_string(),
            avatar: avatar.map(|url| Media {
                url: url.to_string(),
            }),
        }
    }

    fn address(description: Option<&str>, locality: Option<&str>, region: Option<&str>) -> PhysicalAddress {
        PhysicalAddress {
            locality: locality.map(str::to_string),
            description: description.map(str::to_string),
            region: region.map(str::to_string),
        }
    }

    #[test]
    fn hidden_start_time_keeps_date() {
        let record = EventRecord::new("x", time("2024-05-01T14:00:00+02:00")).with_options(false, false);
        let event = normalizer().normalize(record, 0);
        assert_eq!(event.begins_on, "2024-05-01");
    }

    #[test]
    fn shown_start_time_in_display_timezone() {
        let record = EventRecord::new("x", time("2024-05-01T12:00:00Z"))
            .with_ends_on(time("2024-05-01T15:30:00Z"))
            .with_options(true, true);
        let event = normalizer().normalize(record, 3);
        assert_eq!(event.begins_on, "2024-05-01T14:00:00.00+02:00");
        assert_eq!(event.ends_on.as_deref(), Some("2024-05-01T17:30:00.00+02:00"));
        assert_eq!(event.index, 3);
    }

    #[test]
    fn end_flag_is_independent() {
        let record = EventRecord::new("x", time("2024-05-01T12:00:00Z"))
            .with_ends_on(time("2024-05-02T08:00:00Z"))
            .with_options(true, false);
        let event = normalizer().normalize(record, 0);
        assert_eq!(event.ends_on.as_deref(), Some("2024-05-02"));
    }

    #[test]
    fn media_paths_are_encoded() {
        let record = EventRecord::new("x", time("2024-05-01T12:00:00Z"))
            .with_picture("https://mobilizon.example/media/café?w=1 x.jpg")
            .with_organizer(organizer(
                Some("Les bricoleurs"),
                Some("https://mobilizon.example/media/avatar.png"),
            ));
        let event = normalizer().normalize(record, 0);

        assert_eq!(
            event.thumbnail_url.as_deref(),
            Some("assets/mobilizon/media/https_mobilizon.example_media_caf%C3%A9_w_1_x.jpg")
        );
        assert_eq!(
            event.organizer_avatar.as_deref(),
            Some("assets/mobilizon/media/https_mobilizon.example_media_avatar.png")
        );
    }

    #[test]
    fn organizer_link_needs_a_name() {
        let named = EventRecord::new("x", time("2024-05-01T12:00:00Z"))
            .with_organizer(organizer(Some("Les bricoleurs"), None));
        let event = normalizer().normalize(named, 0);
        assert_eq!(event.organizer.as_deref(), Some("Les bricoleurs"));
        assert_eq!(
            event.group_url.as_deref(),
            Some("https://mobilizon.example/@bricoleurs")
        );
        assert_eq!(event.organizer_avatar, None);

        let anonymous = EventRecord::new("x", time("2024-05-01T12:00:00Z"))
            .with_organizer(organizer(None, None));
        let event = normalizer().normalize(anonymous, 0);
        assert_eq!(event.organizer, None);
        assert_eq!(event.group_url, None);
    }

    #[test]
    fn location_variants() {
        assert_eq!(
            location(&address(Some("Salle des fêtes"), Some("Rennes"), Some("Bretagne"))).as_deref(),
            Some("Salle des fêtes, Rennes, Bretagne")
        );
        assert_eq!(
            location(&address(Some("Rennes"), Some("Rennes"), Some("Bretagne"))).as_deref(),
            Some("Rennes, Bretagne")
        );
        assert_eq!(
            location(&address(None, Some("Rennes"), None)).as_deref(),
            Some("Rennes")
        );
        assert_eq!(location(&address(Some("Quelque part"), None, Some("Bretagne"))), None);
    }

    #[test]
    fn normalized_event_shape() {
        let record = EventRecord::new("Repair cafe", time("2024-05-01T12:00:00Z"))
            .with_url("https://mobilizon.example/events/1234")
            .with_ends_on(time("2024-05-01T15:00:00Z"))
            .with_options(true, false)
            .with_organizer(organizer(
                Some("Les bricoleurs"),
                Some("https://mobilizon.example/media/avatar.png"),
            ))
            .with_tag("Reparation", "reparation")
            .with_address(address(Some("Salle des fetes"), Some("Rennes"), Some("Bretagne")));

        insta::assert_json_snapshot!(normalizer().normalize(record, 0), @r#"
        {
          "index": 0,
          "title": "Repair cafe",
          "url": "https://mobilizon.example/events/1234",
          "beginsOn": "2024-05-01T14:00:00.00+02:00",
          "endsOn": "2024-05-01",
          "options": {
            "showStartTime": true,
            "showEndTime": false
          },
          "attributedTo": {
            "name": "Les bricoleurs",
            "preferredUsername": "bricoleurs",
            "avatar": {
              "url": "https://mobilizon.example/media/avatar.png"
            }
          },
          "description": null,
          "onlineAddress": null,
          "physicalAddress": {
            "locality": "Rennes",
            "description": "Salle des fetes",
            "region": "Bretagne"
          },
          "tags": [
            {
              "title": "Reparation",
              "slug": "reparation"
            }
          ],
          "picture": null,
          "thumbnailurl": null,
          "location": "Salle des fetes, Rennes, Bretagne",
          "organizerAvatar": "assets/mobilizon/media/https_mobilizon.example_media_avatar.png",
          "organizer": "Les bricoleurs",
          "groupUrl": "https://mobilizon.example/@bricoleurs"
        }
        "#);
    }
}
