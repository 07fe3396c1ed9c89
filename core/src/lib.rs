//! # Volunteer Hub Core
//!
//! Domain model and engines for the Volunteer Hub sign-up platform.
//!
//! Administrators publish events made of named roles, each with a fixed number
//! of volunteer slots. The public signs up for a role with a name and an email.
//! Everything that has an invariant lives in this crate:
//!
//! - **Data model** ([`types`]): `Event` → `Role` → `Volunteer`, owned top-down
//! - **Signup engine** ([`signup`]): capacity and duplicate-email checks
//! - **Statistics** ([`stats`]): fill metrics derived from an event snapshot
//! - **Listing** ([`listing`]): upcoming vs. full-history queries
//! - **Lifecycle** ([`lifecycle`]): validation for create and update
//! - **Memory store** ([`memory`]): process-local store with revision checks
//! - **Service** ([`service`]): [`VolunteerHub`], which runs the operations
//!   against an [`EventStore`](store::EventStore)
//!
//! ## Concurrency
//!
//! Every mutation is committed with a conditional replace against the
//! [`Revision`](types::Revision) observed when the event was read. A conflict
//! means nothing was written; the service re-reads and re-checks, so two
//! requests racing for the last slot can never both win.
//!
//! ```text
//!   load(id) ──► (event, rev) ──► admit(role, volunteer) ──► replace(event, rev)
//!       ▲                                                          │
//!       └──────────────────────── Conflict ◄───────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use volunteer_hub_core::{VolunteerHub, HubConfig, environment::SystemClock};
//!
//! let hub = VolunteerHub::new(store, Arc::new(SystemClock), HubConfig::default());
//! let receipt = hub.sign_up(event_id, 0, "Ada", "Ada@Example.com").await?;
//! assert_eq!(receipt.volunteer.email, "ada@example.com");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod environment;
pub mod error;
pub mod lifecycle;
pub mod listing;
pub mod memory;
pub mod metrics;
pub mod notification;
pub mod service;
pub mod signup;
pub mod stats;
pub mod store;
pub mod types;

pub use config::HubConfig;
pub use error::{ErrorKind, HubError, StoreError};
pub use listing::{DateOrder, EventQuery};
pub use memory::InMemoryEventStore;
pub use notification::{Notifier, NotifyError, SignupNotice, dispatch_signup_notices};
pub use service::{SignupReceipt, VolunteerHub};
pub use stats::{EventStats, RoleStats, compute_stats};
pub use store::{EventStore, StoreFuture, StoredEvent};
pub use types::{
    Event, EventId, EventPatch, NewEvent, Revision, Role, RoleDraft, RoleKey, Volunteer,
};

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
