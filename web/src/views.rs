//! Response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use volunteer_hub_core::Event;

/// An event as the API returns it: the stored document plus whether it has
/// started yet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    /// Stored document
    #[serde(flatten)]
    pub event: Event,
    /// `date >= now` at response time
    pub is_upcoming: bool,
}

impl EventView {
    /// Wrap an event, judged against `now`.
    #[must_use]
    pub fn new(event: Event, now: DateTime<Utc>) -> Self {
        let is_upcoming = event.is_upcoming(now);
        Self { event, is_upcoming }
    }

    /// Wrap a listing.
    #[must_use]
    pub fn all(events: Vec<Event>, now: DateTime<Utc>) -> Vec<Self> {
        events.into_iter().map(|event| Self::new(event, now)).collect()
    }
}

/// `{success, message, event}` returned by signup and admin mutations.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Always `true`; failures use the error body
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Event after the change
    pub event: EventView,
}

impl EventResponse {
    /// Successful mutation
    #[must_use]
    pub fn ok(message: impl Into<String>, event: EventView) -> Self {
        Self {
            success: true,
            message: message.into(),
            event,
        }
    }
}

/// `{success, message}` for operations with nothing to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Always `true`
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
}

impl MessageResponse {
    /// Successful operation
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use volunteer_hub_core::{EventId, Role};

    fn event_on(date: DateTime<Utc>) -> Event {
        Event {
            id: EventId::new(),
            title: "Beach Cleanup Day".to_string(),
            date,
            time: "8:00 AM - 12:00 PM".to_string(),
            description: "Help keep our beaches clean".to_string(),
            roles: vec![Role::new("Cleanup Crew", 15)],
            created_by: "admin".to_string(),
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn test_view_flattens_event_fields() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let view = EventView::new(event_on(now + Duration::days(1)), now);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "Beach Cleanup Day");
        assert_eq!(json["isUpcoming"], true);
        assert_eq!(json["roles"][0]["totalSlots"], 15);
        assert!(json.get("event").is_none());
    }

    #[test]
    fn test_started_event_is_not_upcoming() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        assert!(!EventView::new(event_on(now - Duration::seconds(1)), now).is_upcoming);
        assert!(EventView::new(event_on(now), now).is_upcoming);
    }
}
