//! Capacity/signup engine.
//!
//! Pure functions over an [`Event`] snapshot. [`admit`] either appends the
//! volunteer or leaves the event untouched; the service decides whether the
//! mutated snapshot can be committed.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. the role exists
//! 2. the role has a free slot ([`HubError::RoleFull`])
//! 3. the email is not already on the role ([`HubError::DuplicateSignup`])

use crate::error::HubError;
use crate::types::{Event, RoleKey, Volunteer};
use chrono::{DateTime, Utc};

/// Trim and lower-case an email for storage and comparison.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A validated, normalized signup request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    name: String,
    email: String,
}

impl Candidate {
    /// Validate and normalize the volunteer's details.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] if the name or email is blank.
    pub fn new(name: &str, email: &str) -> Result<Self, HubError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HubError::validation("name", "is required"));
        }

        let email = normalize_email(email);
        if email.is_empty() {
            return Err(HubError::validation("email", "is required"));
        }

        Ok(Self {
            name: name.to_string(),
            email,
        })
    }

    /// Trimmed name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized email
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Append `candidate` to the role identified by `key`.
///
/// `role_index` is only used to report [`HubError::RoleNotFound`] in the
/// caller's terms. On success `updated_at` moves to `now` and the new
/// volunteer record is returned.
///
/// # Errors
///
/// - [`HubError::RoleNotFound`] if no role has `key`
/// - [`HubError::RoleFull`] if every slot is taken
/// - [`HubError::DuplicateSignup`] if the email is already on the role
pub fn admit(
    event: &mut Event,
    key: RoleKey,
    role_index: usize,
    candidate: &Candidate,
    now: DateTime<Utc>,
) -> Result<Volunteer, HubError> {
    let event_id = event.id;
    let role = event
        .role_by_key_mut(key)
        .ok_or(HubError::RoleNotFound {
            event_id,
            role_index,
        })?;

    if role.is_full() {
        return Err(HubError::RoleFull {
            event_id,
            role: role.name.clone(),
        });
    }

    if role.has_volunteer(candidate.email()) {
        return Err(HubError::DuplicateSignup {
            event_id,
            email: candidate.email().to_string(),
        });
    }

    let volunteer = Volunteer {
        name: candidate.name().to_string(),
        email: candidate.email().to_string(),
        signed_up_at: now,
    };
    role.volunteers.push(volunteer.clone());
    event.updated_at = now;

    Ok(volunteer)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{EventId, Role};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn event_with(roles: Vec<Role>) -> Event {
        let created = Utc::now();
        Event {
            id: EventId::new(),
            title: "Community Food Drive".to_string(),
            date: created,
            time: "10:00 AM - 2:00 PM".to_string(),
            description: "Sort and pack donations".to_string(),
            roles,
            created_by: "admin".to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    fn candidate(email: &str) -> Candidate {
        Candidate::new("Volunteer", email).unwrap()
    }

    #[test]
    fn test_candidate_normalizes_and_validates() {
        let c = Candidate::new("  Ada Lovelace ", "  Ada@Example.COM ").unwrap();
        assert_eq!(c.name(), "Ada Lovelace");
        assert_eq!(c.email(), "ada@example.com");

        assert_eq!(
            Candidate::new("   ", "a@x.com").unwrap_err().kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            Candidate::new("Ada", " ").unwrap_err(),
            HubError::validation("email", "is required")
        );
    }

    #[test]
    fn test_last_slot_then_full() {
        let mut event = event_with(vec![Role::new("Photographer", 2)]);
        let key = event.roles[0].key;
        let later = event.created_at + chrono::Duration::minutes(5);

        admit(&mut event, key, 0, &candidate("a@x.com"), later).unwrap();
        admit(&mut event, key, 0, &candidate("b@x.com"), later).unwrap();
        let err = admit(&mut event, key, 0, &candidate("c@x.com"), later).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RoleFull);
        assert_eq!(event.roles[0].volunteers.len(), 2);
        assert_eq!(event.updated_at, later);
    }

    #[test]
    fn test_duplicate_email_ignores_case() {
        let mut event = event_with(vec![Role::new("Tutor", 5)]);
        let key = event.roles[0].key;

        admit(&mut event, key, 0, &candidate("A@x.com"), Utc::now()).unwrap();
        let err = admit(&mut event, key, 0, &candidate("a@X.COM"), Utc::now()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateSignup);
        assert_eq!(event.roles[0].volunteers.len(), 1);
        assert_eq!(event.roles[0].volunteers[0].email, "a@x.com");
    }

    #[test]
    fn test_full_is_reported_before_duplicate() {
        let mut event = event_with(vec![Role::new("Team Leader", 1)]);
        let key = event.roles[0].key;

        admit(&mut event, key, 0, &candidate("lead@x.com"), Utc::now()).unwrap();
        let err = admit(&mut event, key, 0, &candidate("lead@x.com"), Utc::now()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RoleFull);
    }

    #[test]
    fn test_same_email_allowed_on_other_role() {
        let mut event = event_with(vec![Role::new("Kitchen", 2), Role::new("Games", 2)]);
        let kitchen = event.roles[0].key;
        let games = event.roles[1].key;

        admit(&mut event, kitchen, 0, &candidate("sam@x.com"), Utc::now()).unwrap();
        admit(&mut event, games, 1, &candidate("sam@x.com"), Utc::now()).unwrap();

        assert_eq!(event.roles[0].volunteers.len(), 1);
        assert_eq!(event.roles[1].volunteers.len(), 1);
    }

    #[test]
    fn test_unknown_key_is_role_not_found() {
        let mut event = event_with(vec![Role::new("Helper", 1)]);
        let err = admit(&mut event, RoleKey::new(), 4, &candidate("a@x.com"), Utc::now())
            .unwrap_err();

        assert_eq!(
            err,
            HubError::RoleNotFound {
                event_id: event.id,
                role_index: 4
            }
        );
    }

    proptest! {
        /// Arbitrary signup sequences never overfill a role or repeat an email in it.
        #[test]
        fn prop_invariants_hold_for_any_sequence(
            slots in proptest::collection::vec(1u32..5, 1..4),
            attempts in proptest::collection::vec((0usize..4, 0usize..6, any::<bool>()), 0..40),
        ) {
            let roles = slots.iter().map(|s| Role::new("Role", *s)).collect();
            let mut event = event_with(roles);

            for (role_pick, person, shout) in attempts {
                let index = role_pick % event.roles.len();
                let key = event.roles[index].key;
                let email = if shout {
                    format!("PERSON{person}@EXAMPLE.COM")
                } else {
                    format!("person{person}@example.com")
                };
                let _ = admit(&mut event, key, index, &candidate(&email), Utc::now());
            }

            for role in &event.roles {
                prop_assert!(role.filled_slots() <= role.total_slots);
                let distinct: HashSet<&str> =
                    role.volunteers.iter().map(|v| v.email.as_str()).collect();
                prop_assert_eq!(distinct.len(), role.volunteers.len());
            }
        }
    }
}
