//! Builders for events, drafts and services.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use volunteer_hub_core::config::HubConfig;
use volunteer_hub_core::environment::Clock;
use volunteer_hub_core::memory::InMemoryEventStore;
use volunteer_hub_core::service::VolunteerHub;
use volunteer_hub_core::types::{Event, EventId, NewEvent, Role, RoleDraft, Volunteer};

/// Create draft dated at `date` with roles given as `(name, slots)`.
#[must_use]
pub fn draft_at(title: &str, date: DateTime<Utc>, roles: &[(&str, i64)]) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        date,
        time: "9:00 AM - 1:00 PM".to_string(),
        description: format!("{title} for the neighbourhood"),
        roles: roles
            .iter()
            .map(|(name, slots)| RoleDraft::new(*name, *slots))
            .collect(),
        created_by: None,
    }
}

/// Create draft dated two weeks after 2025-01-01, the default test clock.
#[must_use]
pub fn upcoming_draft(title: &str, roles: &[(&str, i64)]) -> NewEvent {
    draft_at(title, crate::test_clock().now() + Duration::days(14), roles)
}

/// A stored-shape event with empty roles, created at `date`.
#[must_use]
pub fn event_at(date: DateTime<Utc>, roles: &[(&str, u32)]) -> Event {
    Event {
        id: EventId::new(),
        title: "Animal Shelter Support".to_string(),
        date,
        time: "10:00 AM - 3:00 PM".to_string(),
        description: "Walk dogs and tidy kennels".to_string(),
        roles: roles
            .iter()
            .map(|(name, slots)| Role::new(*name, *slots))
            .collect(),
        created_by: "admin".to_string(),
        created_at: date,
        updated_at: date,
    }
}

/// A volunteer record with a lower-cased email.
#[must_use]
pub fn volunteer(name: &str, email: &str, at: DateTime<Utc>) -> Volunteer {
    Volunteer {
        name: name.to_string(),
        email: email.to_lowercase(),
        signed_up_at: at,
    }
}

/// Service over a fresh [`InMemoryEventStore`], returning both.
#[must_use]
pub fn in_memory_hub(clock: impl Clock + 'static) -> (VolunteerHub, InMemoryEventStore) {
    let store = InMemoryEventStore::new();
    let hub = VolunteerHub::new(
        Arc::new(store.clone()),
        Arc::new(clock),
        HubConfig::default(),
    );
    (hub, store)
}
