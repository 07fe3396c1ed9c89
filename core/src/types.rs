//! Domain types for Volunteer Hub.
//!
//! An [`Event`] exclusively owns its [`Role`]s, and a role exclusively owns its
//! [`Volunteer`]s. Nothing holds a reference back to its parent; callers
//! navigate top-down or with an explicit `(EventId, role index)` pair.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Stable identity of a role inside its event.
///
/// Positions are what the public API speaks, but a position can point at a
/// different role after an admin edit. The signup engine resolves the
/// position once and then works with the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleKey(Uuid);

impl RoleKey {
    /// Creates a new random `RoleKey`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `RoleKey` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for RoleKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-document revision used for conditional replace.
///
/// Starts at 1 when a document is inserted; every committed replace moves it
/// forward by one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Revision(u64);

impl Revision {
    /// Revision of a freshly inserted document
    pub const INITIAL: Self = Self(1);

    /// Create a revision from its raw value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The revision a successful replace produces
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A person's signup record for one role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    /// Display name, trimmed
    pub name: String,
    /// Trimmed, lower-cased email; unique within the role
    pub email: String,
    /// When the signup was committed
    pub signed_up_at: DateTime<Utc>,
}

/// A named task within an event with a fixed volunteer capacity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Stable identity
    pub key: RoleKey,
    /// Role name, trimmed
    pub name: String,
    /// Capacity, at least 1
    pub total_slots: u32,
    /// Volunteers in signup order
    #[serde(default)]
    pub volunteers: Vec<Volunteer>,
}

impl Role {
    /// Creates an empty role with a fresh key
    #[must_use]
    pub fn new(name: impl Into<String>, total_slots: u32) -> Self {
        Self {
            key: RoleKey::new(),
            name: name.into(),
            total_slots,
            volunteers: Vec::new(),
        }
    }

    /// Number of volunteers signed up
    #[must_use]
    pub fn filled_slots(&self) -> u32 {
        u32::try_from(self.volunteers.len()).unwrap_or(u32::MAX)
    }

    /// Slots still open
    #[must_use]
    pub fn available_slots(&self) -> u32 {
        self.total_slots.saturating_sub(self.filled_slots())
    }

    /// Whether every slot is taken
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.filled_slots() >= self.total_slots
    }

    /// Whether a volunteer with this (already normalized) email is signed up
    #[must_use]
    pub fn has_volunteer(&self, email: &str) -> bool {
        self.volunteers.iter().any(|v| v.email == email)
    }
}

/// A schedulable community activity with one or more volunteer roles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event ID
    pub id: EventId,
    /// Title
    pub title: String,
    /// When the event takes place
    pub date: DateTime<Utc>,
    /// Free-text time window, e.g. "10:00 AM - 2:00 PM"
    pub time: String,
    /// Description
    pub description: String,
    /// Roles in display order
    pub roles: Vec<Role>,
    /// Who published the event
    pub created_by: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Advances on every committed mutation
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event has not started yet at `now` (inclusive)
    #[must_use]
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date >= now
    }

    /// Role at a zero-based position
    #[must_use]
    pub fn role(&self, index: usize) -> Option<&Role> {
        self.roles.get(index)
    }

    /// Role by stable key
    #[must_use]
    pub fn role_by_key(&self, key: RoleKey) -> Option<&Role> {
        self.roles.iter().find(|role| role.key == key)
    }

    /// Mutable role by stable key
    pub fn role_by_key_mut(&mut self, key: RoleKey) -> Option<&mut Role> {
        self.roles.iter_mut().find(|role| role.key == key)
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Fields for a new event, as an admin submits them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    /// Title
    pub title: String,
    /// Date of occurrence (RFC 3339 or `YYYY-MM-DD`)
    #[serde(deserialize_with = "calendar::deserialize")]
    pub date: DateTime<Utc>,
    /// Time window
    pub time: String,
    /// Description
    pub description: String,
    /// Roles, at least one
    pub roles: Vec<RoleDraft>,
    /// Author tag; defaults to `admin`
    #[serde(default)]
    pub created_by: Option<String>,
}

/// A role as submitted by an admin.
///
/// `total_slots` is signed so that zero and negative capacities reach
/// validation instead of failing deserialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDraft {
    /// Key of an existing role to keep (updates only)
    #[serde(default)]
    pub key: Option<RoleKey>,
    /// Role name
    pub name: String,
    /// Requested capacity
    pub total_slots: i64,
}

impl RoleDraft {
    /// A draft for a brand-new role
    #[must_use]
    pub fn new(name: impl Into<String>, total_slots: i64) -> Self {
        Self {
            key: None,
            name: name.into(),
            total_slots,
        }
    }

    /// A draft that keeps an existing role (and its volunteers)
    #[must_use]
    pub fn keep(role: &Role) -> Self {
        Self {
            key: Some(role.key),
            name: role.name.clone(),
            total_slots: i64::from(role.total_slots),
        }
    }
}

/// Partial update of an event. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New date
    #[serde(default, deserialize_with = "calendar::deserialize_option")]
    pub date: Option<DateTime<Utc>>,
    /// New time window
    #[serde(default)]
    pub time: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement role list
    #[serde(default)]
    pub roles: Option<Vec<RoleDraft>>,
}

/// Lenient date parsing for admin input.
///
/// Accepts full RFC 3339 timestamps as well as bare calendar dates, which are
/// read as midnight UTC.
pub mod calendar {
    use super::{DateTime, Deserialize, Deserializer, NaiveDate, Utc};
    use serde::de::Error;

    /// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date
    #[must_use]
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(timestamp.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
    }

    /// Serde adapter for required dates
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if the string is not a recognised date.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| {
            D::Error::custom(format!(
                "invalid date `{raw}`: expected RFC 3339 or YYYY-MM-DD"
            ))
        })
    }

    /// Serde adapter for optional dates
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if a present string is not a recognised date.
    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                parse(&raw).ok_or_else(|| {
                    D::Error::custom(format!(
                        "invalid date `{raw}`: expected RFC 3339 or YYYY-MM-DD"
                    ))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn volunteer(email: &str) -> Volunteer {
        Volunteer {
            name: "Test".to_string(),
            email: email.to_string(),
            signed_up_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_slot_accounting() {
        let mut role = Role::new("Food Sorter", 2);
        assert_eq!(role.available_slots(), 2);
        assert!(!role.is_full());

        role.volunteers.push(volunteer("a@x.com"));
        role.volunteers.push(volunteer("b@x.com"));

        assert_eq!(role.filled_slots(), 2);
        assert_eq!(role.available_slots(), 0);
        assert!(role.is_full());
        assert!(role.has_volunteer("a@x.com"));
        assert!(!role.has_volunteer("c@x.com"));
    }

    #[test]
    fn test_event_id_parse() {
        let id = EventId::new();
        let parsed: EventId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<EventId>().is_err());
    }

    #[test]
    fn test_calendar_accepts_both_forms() {
        let plain = calendar::parse("2025-12-15").unwrap();
        assert_eq!(plain.to_rfc3339(), "2025-12-15T00:00:00+00:00");

        let full = calendar::parse("2025-12-15T10:00:00-05:00").unwrap();
        assert_eq!(full.to_rfc3339(), "2025-12-15T15:00:00+00:00");

        assert!(calendar::parse("next tuesday").is_none());
    }

    #[test]
    fn test_new_event_wire_format() {
        let json = r#"{
            "title": "Beach Cleanup Day",
            "date": "2025-12-20",
            "time": "8:00 AM - 12:00 PM",
            "description": "Keep the beach clean",
            "roles": [{ "name": "Cleanup Crew", "totalSlots": 15 }]
        }"#;

        let draft: NewEvent = serde_json::from_str(json).unwrap();
        assert_eq!(draft.roles[0].total_slots, 15);
        assert!(draft.roles[0].key.is_none());
        assert!(draft.created_by.is_none());
    }

    #[test]
    fn test_patch_fields_default_to_absent() {
        let patch: EventPatch = serde_json::from_str(r#"{ "title": "Renamed" }"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Renamed"));
        assert!(patch.date.is_none());
        assert!(patch.roles.is_none());
    }

    #[test]
    fn test_revision_sequence() {
        assert_eq!(Revision::INITIAL.value(), 1);
        assert_eq!(Revision::INITIAL.next(), Revision::new(2));
    }
}
