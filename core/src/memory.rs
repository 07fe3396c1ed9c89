//! Process-local [`EventStore`].
//!
//! Backs the server's `memory` backend and most of the test suite. Replace is
//! revision-checked exactly like the Postgres store, so races behave the same
//! way in both.

use crate::error::StoreError;
use crate::listing::EventQuery;
use crate::store::{EventStore, StoreFuture, StoredEvent};
use crate::types::{Event, EventId, Revision};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Documents = HashMap<EventId, StoredEvent>;

/// In-memory event store.
///
/// Clones share the same documents. Contents are lost when the process exits.
///
/// # Example
///
/// ```
/// use volunteer_hub_core::memory::InMemoryEventStore;
///
/// let store = InMemoryEventStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryEventStore {
    documents: Arc<RwLock<Documents>>,
}

impl InMemoryEventStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Current document and revision, bypassing the async interface
    #[must_use]
    pub fn snapshot(&self, id: EventId) -> Option<StoredEvent> {
        self.read().get(&id).cloned()
    }

    /// Put an event in place directly, at [`Revision::INITIAL`].
    pub fn seed(&self, event: Event) {
        self.write().insert(
            event.id,
            StoredEvent {
                event,
                revision: Revision::INITIAL,
            },
        );
    }

    /// Edit a stored document in place and bump its revision, as another
    /// writer would. Returns the new revision, or `None` if it is absent.
    pub fn modify(&self, id: EventId, edit: impl FnOnce(&mut Event)) -> Option<Revision> {
        let mut documents = self.write();
        let stored = documents.get_mut(&id)?;
        edit(&mut stored.event);
        stored.revision = stored.revision.next();
        Some(stored.revision)
    }

    // A panic while holding the lock cannot leave a document half-written:
    // every mutation below is a single map operation.
    fn read(&self) -> RwLockReadGuard<'_, Documents> {
        self.documents.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Documents> {
        self.documents.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_now(&self, event: Event) -> Result<Revision, StoreError> {
        let mut documents = self.write();
        if documents.contains_key(&event.id) {
            return Err(StoreError::Database(format!(
                "duplicate key: event {} already exists",
                event.id
            )));
        }
        documents.insert(
            event.id,
            StoredEvent {
                event,
                revision: Revision::INITIAL,
            },
        );
        Ok(Revision::INITIAL)
    }

    fn replace_now(&self, event: Event, expected: Revision) -> Result<Revision, StoreError> {
        let mut documents = self.write();
        let stored = documents
            .get_mut(&event.id)
            .ok_or(StoreError::NotFound(event.id))?;

        if stored.revision != expected {
            return Err(StoreError::Conflict {
                event_id: event.id,
                expected,
                actual: stored.revision,
            });
        }

        stored.event = event;
        stored.revision = expected.next();
        Ok(stored.revision)
    }

    fn query_now(&self, query: &EventQuery) -> Vec<Event> {
        let events: Vec<Event> = self
            .read()
            .values()
            .map(|stored| stored.event.clone())
            .collect();
        query.apply(events)
    }
}

impl EventStore for InMemoryEventStore {
    fn insert(&self, event: Event) -> StoreFuture<'_, Revision> {
        Box::pin(async move { self.insert_now(event) })
    }

    fn load(&self, id: EventId) -> StoreFuture<'_, Option<StoredEvent>> {
        Box::pin(async move { Ok(self.snapshot(id)) })
    }

    fn query(&self, query: EventQuery) -> StoreFuture<'_, Vec<Event>> {
        Box::pin(async move { Ok(self.query_now(&query)) })
    }

    fn replace(&self, event: Event, expected: Revision) -> StoreFuture<'_, Revision> {
        Box::pin(async move { self.replace_now(event, expected) })
    }

    fn remove(&self, id: EventId) -> StoreFuture<'_, bool> {
        Box::pin(async move { Ok(self.write().remove(&id).is_some()) })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}
