//! Time-based filtering and ordering of events.
//!
//! "Upcoming" means `date >= now`, with `now` read once per listing call. The
//! public listing shows upcoming events soonest first; the admin listing shows
//! everything, most recent first.
//!
//! Stores push [`EventQuery`] down when they can (the Postgres store turns it
//! into `WHERE`/`ORDER BY`) and fall back to [`EventQuery::apply`] otherwise.

use crate::types::Event;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Sort direction on the event date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateOrder {
    /// Soonest first
    Ascending,
    /// Most recent first
    Descending,
}

impl DateOrder {
    /// SQL keyword for this direction
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Filter and ordering for [`EventStore::query`](crate::store::EventStore::query).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventQuery {
    /// Only events dated at or after this instant
    pub not_before: Option<DateTime<Utc>>,
    /// Result order
    pub order: DateOrder,
}

impl EventQuery {
    /// Events that have not started at `now`, soonest first
    #[must_use]
    pub const fn upcoming(now: DateTime<Utc>) -> Self {
        Self {
            not_before: Some(now),
            order: DateOrder::Ascending,
        }
    }

    /// Every event, most recent first
    #[must_use]
    pub const fn all() -> Self {
        Self {
            not_before: None,
            order: DateOrder::Descending,
        }
    }

    /// Whether an event passes the filter
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        self.not_before.is_none_or(|bound| event.date >= bound)
    }

    /// Total order used for results.
    ///
    /// Ties on `date` fall back to `created_at`, then `id`, in the same
    /// direction, so repeated queries list events identically.
    #[must_use]
    pub fn compare(&self, a: &Event, b: &Event) -> Ordering {
        let ascending = a
            .date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id));

        match self.order {
            DateOrder::Ascending => ascending,
            DateOrder::Descending => ascending.reverse(),
        }
    }

    /// Filter and sort a set of events
    #[must_use]
    pub fn apply(&self, events: impl IntoIterator<Item = Event>) -> Vec<Event> {
        let mut selected: Vec<Event> = events.into_iter().filter(|e| self.matches(e)).collect();
        selected.sort_by(|a, b| self.compare(a, b));
        selected
    }
}
