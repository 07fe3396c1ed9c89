//! Error types for Volunteer Hub.
//!
//! [`HubError`] is the taxonomy every service operation reports. Only
//! [`HubError::TransientStore`] is worth retrying; the rest describe the
//! request itself and will fail the same way again.
//!
//! [`StoreError`] is what [`EventStore`](crate::store::EventStore)
//! implementations return. The service handles revision conflicts itself and
//! folds everything else into the taxonomy.

use crate::types::{EventId, Revision};
use thiserror::Error;

/// Errors reported by [`VolunteerHub`](crate::service::VolunteerHub) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    /// No event with this ID exists.
    #[error("Event not found")]
    EventNotFound(EventId),

    /// The event exists but has no role at this position.
    #[error("Role not found")]
    RoleNotFound {
        /// Event that was searched
        event_id: EventId,
        /// Position the caller asked for
        role_index: usize,
    },

    /// A required field is missing or malformed.
    #[error("{field} {reason}")]
    Validation {
        /// Offending field, e.g. `roles[1].totalSlots`
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// Every slot of the role is taken.
    #[error("This role is full")]
    RoleFull {
        /// Event the role belongs to
        event_id: EventId,
        /// Role name
        role: String,
    },

    /// The email is already signed up for this role.
    #[error("Email already registered for this role")]
    DuplicateSignup {
        /// Event the role belongs to
        event_id: EventId,
        /// Normalized email
        email: String,
    },

    /// The store timed out, was unreachable, or kept conflicting.
    #[error("Store unavailable: {reason}")]
    TransientStore {
        /// Underlying cause
        reason: String,
    },
}

/// Coarse classification of a [`HubError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Event or role absent
    NotFound,
    /// Malformed or missing input
    Validation,
    /// Role at capacity
    RoleFull,
    /// Email already on the role
    DuplicateSignup,
    /// Store trouble; retry with backoff
    TransientStore,
}

impl HubError {
    /// Build a validation error for a field
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a transient store error
    #[must_use]
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::TransientStore {
            reason: reason.into(),
        }
    }

    /// Classification of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EventNotFound(_) | Self::RoleNotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::RoleFull { .. } => ErrorKind::RoleFull,
            Self::DuplicateSignup { .. } => ErrorKind::DuplicateSignup,
            Self::TransientStore { .. } => ErrorKind::TransientStore,
        }
    }

    /// Whether the caller may retry the same request
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::TransientStore)
    }
}

/// Errors returned by event store implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The document changed since it was read.
    #[error("Revision conflict on event {event_id}: expected {expected}, found {actual}")]
    Conflict {
        /// Document that was being replaced
        event_id: EventId,
        /// Revision the writer read
        expected: Revision,
        /// Revision currently stored
        actual: Revision,
    },

    /// The document does not exist.
    #[error("Event not found: {0}")]
    NotFound(EventId),

    /// The operation did not finish in time.
    #[error("Store operation `{operation}` timed out after {millis} ms")]
    Timeout {
        /// Store method that was running
        operation: &'static str,
        /// Configured limit
        millis: u64,
    },

    /// Connection or query failure.
    #[error("Database error: {0}")]
    Database(String),

    /// A document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<StoreError> for HubError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(event_id) => Self::EventNotFound(event_id),
            other => Self::transient(other.to_string()),
        }
    }
}
