//! Validation for creating and updating events.
//!
//! Both paths end in [`validate`], so an update can never produce an event
//! that create would have rejected.

use crate::error::HubError;
use crate::types::{Event, EventId, EventPatch, NewEvent, Role, RoleDraft, RoleKey};
use chrono::{DateTime, SubsecRound, Utc};
use std::collections::HashSet;

/// Author tag used when none is supplied
pub const DEFAULT_AUTHOR: &str = "admin";

/// Build a new event from admin input.
///
/// Text fields are trimmed, each role gets a fresh key and no volunteers.
///
/// # Errors
///
/// Returns [`HubError::Validation`] naming the first offending field.
pub fn build_event(draft: NewEvent, id: EventId, now: DateTime<Utc>) -> Result<Event, HubError> {
    let roles = draft
        .roles
        .iter()
        .enumerate()
        .map(|(index, role)| fresh_role(index, role))
        .collect::<Result<Vec<_>, _>>()?;

    let created_by = draft
        .created_by
        .as_deref()
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .unwrap_or(DEFAULT_AUTHOR)
        .to_string();

    let event = Event {
        id,
        title: draft.title.trim().to_string(),
        date: stored_precision(draft.date),
        time: draft.time.trim().to_string(),
        description: draft.description.trim().to_string(),
        roles,
        created_by,
        created_at: now,
        updated_at: now,
    };

    validate(&event)?;
    Ok(event)
}

/// Merge a patch into an existing event.
///
/// A supplied role list replaces the current one. Drafts carrying the key of
/// an existing role keep its volunteers; any other draft becomes a new, empty
/// role.
///
/// # Errors
///
/// Returns [`HubError::Validation`] if the merged event is invalid, a key is
/// repeated, or a kept role would shrink below its volunteer count.
pub fn apply_patch(
    current: &Event,
    patch: &EventPatch,
    now: DateTime<Utc>,
) -> Result<Event, HubError> {
    let mut merged = current.clone();

    if let Some(title) = &patch.title {
        merged.title = title.trim().to_string();
    }
    if let Some(date) = patch.date {
        merged.date = stored_precision(date);
    }
    if let Some(time) = &patch.time {
        merged.time = time.trim().to_string();
    }
    if let Some(description) = &patch.description {
        merged.description = description.trim().to_string();
    }
    if let Some(drafts) = &patch.roles {
        merged.roles = merge_roles(current, drafts)?;
    }

    merged.updated_at = now;
    validate(&merged)?;
    Ok(merged)
}

/// Event dates are kept to the microsecond, the precision of `timestamptz`.
fn stored_precision(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(6)
}

/// Check the invariants every stored event satisfies.
///
/// # Errors
///
/// Returns [`HubError::Validation`] naming the first offending field.
pub fn validate(event: &Event) -> Result<(), HubError> {
    require_text("title", &event.title)?;
    require_text("time", &event.time)?;
    require_text("description", &event.description)?;

    if event.roles.is_empty() {
        return Err(HubError::validation("roles", "must contain at least one role"));
    }

    for (index, role) in event.roles.iter().enumerate() {
        require_text(&format!("roles[{index}].name"), &role.name)?;
        if role.total_slots == 0 {
            return Err(HubError::validation(
                format!("roles[{index}].totalSlots"),
                "must be at least 1",
            ));
        }
        if role.filled_slots() > role.total_slots {
            return Err(HubError::validation(
                format!("roles[{index}].totalSlots"),
                format!(
                    "cannot be less than the {} volunteers already signed up",
                    role.filled_slots()
                ),
            ));
        }
    }

    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<(), HubError> {
    if value.trim().is_empty() {
        return Err(HubError::validation(field, "is required"));
    }
    Ok(())
}

fn slots(index: usize, requested: i64) -> Result<u32, HubError> {
    if requested < 1 {
        return Err(HubError::validation(
            format!("roles[{index}].totalSlots"),
            "must be at least 1",
        ));
    }
    u32::try_from(requested).map_err(|_| {
        HubError::validation(format!("roles[{index}].totalSlots"), "is too large")
    })
}

fn fresh_role(index: usize, draft: &RoleDraft) -> Result<Role, HubError> {
    Ok(Role::new(draft.name.trim(), slots(index, draft.total_slots)?))
}

fn merge_roles(current: &Event, drafts: &[RoleDraft]) -> Result<Vec<Role>, HubError> {
    let mut seen: HashSet<RoleKey> = HashSet::new();
    let mut roles = Vec::with_capacity(drafts.len());

    for (index, draft) in drafts.iter().enumerate() {
        let existing = draft.key.and_then(|key| current.role_by_key(key));

        let role = match existing {
            Some(kept) => {
                if !seen.insert(kept.key) {
                    return Err(HubError::validation(
                        format!("roles[{index}].key"),
                        "refers to a role listed more than once",
                    ));
                }
                Role {
                    key: kept.key,
                    name: draft.name.trim().to_string(),
                    total_slots: slots(index, draft.total_slots)?,
                    volunteers: kept.volunteers.clone(),
                }
            }
            None => fresh_role(index, draft)?,
        };
        roles.push(role);
    }

    Ok(roles)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::Volunteer;
    use chrono::{Duration, TimeZone};

    fn draft(roles: Vec<RoleDraft>) -> NewEvent {
        NewEvent {
            title: "  Youth Mentorship Program ".to_string(),
            date: Utc::now() + Duration::days(30),
            time: "4:00 PM - 6:00 PM".to_string(),
            description: "Homework help and career advice".to_string(),
            roles,
            created_by: None,
        }
    }

    fn field_of(err: HubError) -> String {
        match err {
            HubError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_build_trims_and_assigns() {
        let now = Utc::now();
        let id = EventId::new();
        let event = build_event(draft(vec![RoleDraft::new(" Tutor ", 8)]), id, now).unwrap();

        assert_eq!(event.id, id);
        assert_eq!(event.title, "Youth Mentorship Program");
        assert_eq!(event.roles[0].name, "Tutor");
        assert_eq!(event.roles[0].total_slots, 8);
        assert!(event.roles[0].volunteers.is_empty());
        assert_eq!(event.created_by, DEFAULT_AUTHOR);
        assert_eq!(event.created_at, now);
        assert_eq!(event.updated_at, now);
    }

    #[test]
    fn test_dates_are_kept_to_the_microsecond() {
        let now = Utc::now();
        let precise = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
            + Duration::nanoseconds(123_456_789);
        let expected = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
            + Duration::nanoseconds(123_456_000);

        let mut new_event = draft(vec![RoleDraft::new("Tutor", 2)]);
        new_event.date = precise;
        let event = build_event(new_event, EventId::new(), now).unwrap();
        assert_eq!(event.date, expected);

        let patch = EventPatch {
            date: Some(precise + Duration::days(1)),
            ..EventPatch::default()
        };
        let merged = apply_patch(&event, &patch, now).unwrap();
        assert_eq!(merged.date, expected + Duration::days(1));
    }

    #[test]
    fn test_build_rejects_missing_pieces() {
        let now = Utc::now();

        let err = build_event(draft(vec![]), EventId::new(), now).unwrap_err();
        assert_eq!(field_of(err), "roles");

        let err = build_event(draft(vec![RoleDraft::new("Tutor", 0)]), EventId::new(), now)
            .unwrap_err();
        assert_eq!(field_of(err), "roles[0].totalSlots");

        let err = build_event(
            draft(vec![RoleDraft::new("Tutor", 2), RoleDraft::new("Mentor", -3)]),
            EventId::new(),
            now,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "roles[1].totalSlots");

        let err = build_event(draft(vec![RoleDraft::new("  ", 2)]), EventId::new(), now)
            .unwrap_err();
        assert_eq!(field_of(err), "roles[0].name");

        let mut blank_title = draft(vec![RoleDraft::new("Tutor", 2)]);
        blank_title.title = "   ".to_string();
        let err = build_event(blank_title, EventId::new(), now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(field_of(err), "title");
    }

    #[test]
    fn test_patch_merges_fields_and_keeps_volunteers() {
        let created = Utc::now();
        let mut event =
            build_event(draft(vec![RoleDraft::new("Tutor", 3)]), EventId::new(), created).unwrap();
        event.roles[0].volunteers.push(Volunteer {
            name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            signed_up_at: created,
        });

        let later = created + Duration::hours(1);
        let mut kept = RoleDraft::keep(&event.roles[0]);
        kept.total_slots = 5;
        let patch = EventPatch {
            title: Some(" Renamed ".to_string()),
            roles: Some(vec![kept, RoleDraft::new("Career Mentor", 2)]),
            ..EventPatch::default()
        };

        let merged = apply_patch(&event, &patch, later).unwrap();
        assert_eq!(merged.title, "Renamed");
        assert_eq!(merged.description, event.description);
        assert_eq!(merged.roles.len(), 2);
        assert_eq!(merged.roles[0].key, event.roles[0].key);
        assert_eq!(merged.roles[0].total_slots, 5);
        assert_eq!(merged.roles[0].volunteers.len(), 1);
        assert!(merged.roles[1].volunteers.is_empty());
        assert_eq!(merged.updated_at, later);
        assert_eq!(merged.created_at, created);
    }

    #[test]
    fn test_patch_cannot_shrink_below_signups() {
        let now = Utc::now();
        let mut event =
            build_event(draft(vec![RoleDraft::new("Tutor", 2)]), EventId::new(), now).unwrap();
        for email in ["a@x.com", "b@x.com"] {
            event.roles[0].volunteers.push(Volunteer {
                name: "V".to_string(),
                email: email.to_string(),
                signed_up_at: now,
            });
        }

        let mut shrunk = RoleDraft::keep(&event.roles[0]);
        shrunk.total_slots = 1;
        let patch = EventPatch {
            roles: Some(vec![shrunk]),
            ..EventPatch::default()
        };

        let err = apply_patch(&event, &patch, now).unwrap_err();
        assert_eq!(field_of(err), "roles[0].totalSlots");
    }

    #[test]
    fn test_patch_rejects_repeated_key_and_blank_text() {
        let now = Utc::now();
        let event =
            build_event(draft(vec![RoleDraft::new("Tutor", 2)]), EventId::new(), now).unwrap();

        let repeated = EventPatch {
            roles: Some(vec![
                RoleDraft::keep(&event.roles[0]),
                RoleDraft::keep(&event.roles[0]),
            ]),
            ..EventPatch::default()
        };
        assert_eq!(field_of(apply_patch(&event, &repeated, now).unwrap_err()), "roles[1].key");

        let blank = EventPatch {
            description: Some("  ".to_string()),
            ..EventPatch::default()
        };
        assert_eq!(field_of(apply_patch(&event, &blank, now).unwrap_err()), "description");

        let emptied = EventPatch {
            roles: Some(vec![]),
            ..EventPatch::default()
        };
        assert_eq!(field_of(apply_patch(&event, &emptied, now).unwrap_err()), "roles");
    }
}
