//! Event store trait and query types.
//!
//! The store is a durable collection of [`Event`] documents. It knows nothing
//! about capacity or duplicate emails; its one concurrency duty is
//! [`EventStore::replace`], which must only write when the stored revision is
//! still the one the caller read.
//!
//! # Implementations
//!
//! - `PostgresEventStore` (in `volunteer-hub-postgres`): JSONB documents
//! - [`InMemoryEventStore`](crate::memory::InMemoryEventStore): `HashMap` under a lock
//!
//! # Dyn Compatibility
//!
//! Methods return `Pin<Box<dyn Future>>` instead of using `async fn` so the
//! service can hold an `Arc<dyn EventStore>`.

use crate::error::StoreError;
use crate::listing::EventQuery;
use crate::types::{Event, EventId, Revision};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by store methods
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// An event together with the revision it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredEvent {
    /// Document contents
    pub event: Event,
    /// Revision to pass back to [`EventStore::replace`]
    pub revision: Revision,
}

/// Durable collection of event documents.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one instance serves every request.
pub trait EventStore: Send + Sync {
    /// Insert a new document at [`Revision::INITIAL`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the ID is taken or the write fails.
    fn insert(&self, event: Event) -> StoreFuture<'_, Revision>;

    /// Load a document and its current revision.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails; a missing document is `Ok(None)`.
    fn load(&self, id: EventId) -> StoreFuture<'_, Option<StoredEvent>>;

    /// Documents matching the query, in the query's order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn query(&self, query: EventQuery) -> StoreFuture<'_, Vec<Event>>;

    /// Replace a document if it is still at `expected`.
    ///
    /// Returns the new revision.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Conflict`]: the stored revision moved; nothing was written
    /// - [`StoreError::NotFound`]: the document was deleted
    fn replace(&self, event: Event, expected: Revision) -> StoreFuture<'_, Revision>;

    /// Delete a document. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove(&self, id: EventId) -> StoreFuture<'_, bool>;

    /// Cheap reachability probe for readiness checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn ping(&self) -> StoreFuture<'_, ()>;
}
