//! Misbehaving event stores for tests. Each wraps or replaces the
//! [`InMemoryEventStore`] to produce one kind of failure on demand.
//!
//! - [`InterleavingEventStore`]: lets a "concurrent writer" change a document
//!   right before the next replace lands
//! - [`StalledEventStore`]: never answers
//! - [`UnavailableEventStore`]: always fails

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on a poisoned lock

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use volunteer_hub_core::error::StoreError;
use volunteer_hub_core::listing::EventQuery;
use volunteer_hub_core::memory::InMemoryEventStore;
use volunteer_hub_core::store::{EventStore, StoreFuture, StoredEvent};
use volunteer_hub_core::types::{Event, EventId, Revision};

type Interloper = Box<dyn Fn(&mut Event) + Send + Sync>;

/// Store wrapper that simulates a concurrent writer.
///
/// Before each of the next `times` replaces, the interloper edits the stored
/// document (bumping its revision), so the replace that follows conflicts
/// and the caller has to re-read.
pub struct InterleavingEventStore {
    inner: InMemoryEventStore,
    remaining: AtomicUsize,
    interloper: Interloper,
    replaces: AtomicUsize,
}

impl InterleavingEventStore {
    /// Wrap `inner`, interfering with the next `times` replaces
    pub fn new(
        inner: InMemoryEventStore,
        times: usize,
        interloper: impl Fn(&mut Event) + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(times),
            interloper: Box::new(interloper),
            replaces: AtomicUsize::new(0),
        }
    }

    /// Replace calls seen so far, including the ones that conflicted
    #[must_use]
    pub fn replace_calls(&self) -> usize {
        self.replaces.load(Ordering::SeqCst)
    }

    fn take_turn(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl EventStore for InterleavingEventStore {
    fn insert(&self, event: Event) -> StoreFuture<'_, Revision> {
        self.inner.insert(event)
    }

    fn load(&self, id: EventId) -> StoreFuture<'_, Option<StoredEvent>> {
        self.inner.load(id)
    }

    fn query(&self, query: EventQuery) -> StoreFuture<'_, Vec<Event>> {
        self.inner.query(query)
    }

    fn replace(&self, event: Event, expected: Revision) -> StoreFuture<'_, Revision> {
        self.replaces.fetch_add(1, Ordering::SeqCst);
        if self.take_turn() {
            self.inner.modify(event.id, |stored| (self.interloper)(stored));
        }
        self.inner.replace(event, expected)
    }

    fn remove(&self, id: EventId) -> StoreFuture<'_, bool> {
        self.inner.remove(id)
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        self.inner.ping()
    }
}

/// Store whose calls never complete. Exercises the service's timeouts.
#[derive(Clone, Debug, Default)]
pub struct StalledEventStore;

impl EventStore for StalledEventStore {
    fn insert(&self, _event: Event) -> StoreFuture<'_, Revision> {
        Box::pin(futures::future::pending())
    }

    fn load(&self, _id: EventId) -> StoreFuture<'_, Option<StoredEvent>> {
        Box::pin(futures::future::pending())
    }

    fn query(&self, _query: EventQuery) -> StoreFuture<'_, Vec<Event>> {
        Box::pin(futures::future::pending())
    }

    fn replace(&self, _event: Event, _expected: Revision) -> StoreFuture<'_, Revision> {
        Box::pin(futures::future::pending())
    }

    fn remove(&self, _id: EventId) -> StoreFuture<'_, bool> {
        Box::pin(futures::future::pending())
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(futures::future::pending())
    }
}

/// Store that fails every call with [`StoreError::Database`].
#[derive(Clone, Debug)]
pub struct UnavailableEventStore {
    reason: String,
    calls: Arc<Mutex<usize>>,
}

impl UnavailableEventStore {
    /// Fail with `reason`
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Calls made so far
    #[must_use]
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn fail<T: Send + 'static>(&self) -> StoreFuture<'_, T> {
        *self.calls.lock().unwrap() += 1;
        let error = StoreError::Database(self.reason.clone());
        Box::pin(async move { Err(error) })
    }
}

impl Default for UnavailableEventStore {
    fn default() -> Self {
        Self::new("connection refused")
    }
}

impl EventStore for UnavailableEventStore {
    fn insert(&self, _event: Event) -> StoreFuture<'_, Revision> {
        self.fail()
    }

    fn load(&self, _id: EventId) -> StoreFuture<'_, Option<StoredEvent>> {
        self.fail()
    }

    fn query(&self, _query: EventQuery) -> StoreFuture<'_, Vec<Event>> {
        self.fail()
    }

    fn replace(&self, _event: Event, _expected: Revision) -> StoreFuture<'_, Revision> {
        self.fail()
    }

    fn remove(&self, _id: EventId) -> StoreFuture<'_, bool> {
        self.fail()
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        self.fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::event_at;
    use crate::test_clock;
    use volunteer_hub_core::environment::Clock;

    #[tokio::test]
    async fn test_interleaving_forces_one_conflict() {
        let inner = InMemoryEventStore::new();
        let event = event_at(test_clock().now(), &[("Helper", 2)]);
        inner.seed(event.clone());

        let store = InterleavingEventStore::new(inner.clone(), 1, |e| e.title.push('!'));

        assert!(matches!(
            store.replace(event.clone(), Revision::INITIAL).await,
            Err(StoreError::Conflict { .. })
        ));
        assert_eq!(
            store.replace(event.clone(), Revision::new(2)).await.unwrap(),
            Revision::new(3)
        );
        assert_eq!(store.replace_calls(), 2);
        assert_eq!(inner.snapshot(event.id).unwrap().event.title, event.title);
    }
}
