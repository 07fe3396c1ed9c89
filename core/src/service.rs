//! The Volunteer Hub service.
//!
//! [`VolunteerHub`] runs every operation the HTTP layer exposes against an
//! [`EventStore`]. Mutations go through one commit loop: load the
//! document with its revision, apply the change to a copy, and replace only
//! if the revision is unchanged. A lost race means nothing was written, so
//! the change is re-evaluated against the fresh document.

use crate::config::HubConfig;
use crate::environment::Clock;
use crate::error::{HubError, StoreError};
use crate::lifecycle::{apply_patch, build_event};
use crate::listing::EventQuery;
use crate::signup::{Candidate, admit};
use crate::stats::{EventStats, compute_stats};
use crate::store::{EventStore, StoreFuture};
use crate::types::{Event, EventId, EventPatch, NewEvent, RoleKey, Volunteer};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Result of a committed signup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignupReceipt {
    /// Event as committed, including the new volunteer
    pub event: Event,
    /// Position the caller asked for
    pub role_index: usize,
    /// Stable key of the role
    pub role_key: RoleKey,
    /// Role name at commit time
    pub role_name: String,
    /// Record that was appended
    pub volunteer: Volunteer,
}

/// Service handle. Cheap to clone; clones share the store and clock.
#[derive(Clone)]
pub struct VolunteerHub {
    store: Arc<dyn EventStore>,
    clock: Arc<dyn Clock>,
    config: HubConfig,
}

impl VolunteerHub {
    /// Create a service over a store.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>, clock: Arc<dyn Clock>, config: HubConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Limits in effect
    #[must_use]
    pub const fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Current time as the service sees it
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Publish a new event.
    ///
    /// # Errors
    ///
    /// - [`HubError::Validation`] if the draft is incomplete
    /// - [`HubError::TransientStore`] if the insert fails
    #[tracing::instrument(skip_all, fields(title = %draft.title))]
    pub async fn create(&self, draft: NewEvent) -> Result<Event, HubError> {
        let event = build_event(draft, EventId::new(), self.clock.now())?;

        self.store_call("insert", self.store.insert(event.clone())).await?;

        crate::metrics::record_event_created();
        tracing::info!(event_id = %event.id, roles = event.roles.len(), "Event created");
        Ok(event)
    }

    /// Merge a patch into an event.
    ///
    /// # Errors
    ///
    /// - [`HubError::EventNotFound`] if the event does not exist
    /// - [`HubError::Validation`] if the merged event is invalid
    /// - [`HubError::TransientStore`] on store failure or persistent conflicts
    #[tracing::instrument(skip_all, fields(event_id = %id))]
    pub async fn update(&self, id: EventId, patch: &EventPatch) -> Result<Event, HubError> {
        let (event, ()) = self
            .commit(id, |event, now| {
                *event = apply_patch(event, patch, now)?;
                Ok(())
            })
            .await?;

        tracing::info!("Event updated");
        Ok(event)
    }

    /// Delete an event and every signup it holds.
    ///
    /// # Errors
    ///
    /// - [`HubError::EventNotFound`] if the event does not exist
    /// - [`HubError::TransientStore`] if the delete fails
    #[tracing::instrument(skip_all, fields(event_id = %id))]
    pub async fn delete(&self, id: EventId) -> Result<(), HubError> {
        let existed = self.store_call("remove", self.store.remove(id)).await?;
        if !existed {
            return Err(HubError::EventNotFound(id));
        }

        crate::metrics::record_event_deleted();
        tracing::info!("Event deleted");
        Ok(())
    }

    /// Fetch one event.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::TransientStore`] if the read fails.
    pub async fn get_by_id(&self, id: EventId) -> Result<Option<Event>, HubError> {
        let stored = self.store_call("load", self.store.load(id)).await?;
        Ok(stored.map(|s| s.event))
    }

    /// Events that have not started yet, soonest first.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::TransientStore`] if the read fails.
    pub async fn list_upcoming(&self) -> Result<Vec<Event>, HubError> {
        let query = EventQuery::upcoming(self.clock.now());
        Ok(self.store_call("query", self.store.query(query)).await?)
    }

    /// Every event, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::TransientStore`] if the read fails.
    pub async fn list_all(&self) -> Result<Vec<Event>, HubError> {
        Ok(self
            .store_call("query", self.store.query(EventQuery::all()))
            .await?)
    }

    /// Fill statistics for one event, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::TransientStore`] if the read fails.
    pub async fn event_stats(&self, id: EventId) -> Result<Option<EventStats>, HubError> {
        Ok(self.get_by_id(id).await?.as_ref().map(compute_stats))
    }

    /// Sign a volunteer up for the role at `role_index`.
    ///
    /// Name and email are validated before the store is touched. The role
    /// position is resolved to its key on the first read; retries after a
    /// conflict look the role up by that key.
    ///
    /// # Errors
    ///
    /// - [`HubError::Validation`] if the name or email is blank
    /// - [`HubError::EventNotFound`] / [`HubError::RoleNotFound`]
    /// - [`HubError::RoleFull`] if no slot is left
    /// - [`HubError::DuplicateSignup`] if the email is already on the role
    /// - [`HubError::TransientStore`] on store failure or persistent conflicts
    #[tracing::instrument(skip_all, fields(event_id = %event_id, role_index = role_index))]
    pub async fn sign_up(
        &self,
        event_id: EventId,
        role_index: usize,
        name: &str,
        email: &str,
    ) -> Result<SignupReceipt, HubError> {
        let result = self.try_sign_up(event_id, role_index, name, email).await;
        crate::metrics::record_signup(&result);

        match &result {
            Ok(receipt) => tracing::info!(role = %receipt.role_name, "Volunteer signed up"),
            Err(error) if error.is_retryable() => {
                tracing::error!(error = %error, "Signup failed");
            }
            Err(error) => tracing::debug!(error = %error, "Signup rejected"),
        }
        result
    }

    async fn try_sign_up(
        &self,
        event_id: EventId,
        role_index: usize,
        name: &str,
        email: &str,
    ) -> Result<SignupReceipt, HubError> {
        let candidate = Candidate::new(name, email)?;
        let mut resolved: Option<RoleKey> = None;

        let (event, (role_key, volunteer)) = self
            .commit(event_id, |event, now| {
                let key = match resolved {
                    Some(key) => key,
                    None => {
                        let key = event
                            .role(role_index)
                            .ok_or(HubError::RoleNotFound {
                                event_id,
                                role_index,
                            })?
                            .key;
                        resolved = Some(key);
                        key
                    }
                };
                let volunteer = admit(event, key, role_index, &candidate, now)?;
                Ok((key, volunteer))
            })
            .await?;

        let role_name = event
            .role_by_key(role_key)
            .map(|role| role.name.clone())
            .unwrap_or_default();

        Ok(SignupReceipt {
            event,
            role_index,
            role_key,
            role_name,
            volunteer,
        })
    }

    /// Check that the store answers.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::TransientStore`] if it does not.
    pub async fn ping(&self) -> Result<(), HubError> {
        Ok(self.store_call("ping", self.store.ping()).await?)
    }

    /// Load, mutate a copy, and replace conditionally, re-evaluating on
    /// conflict.
    ///
    /// `mutate` sees a fresh document on every round. Its error ends the
    /// operation immediately; nothing is written for a failed round.
    async fn commit<T, F>(&self, id: EventId, mut mutate: F) -> Result<(Event, T), HubError>
    where
        F: FnMut(&mut Event, DateTime<Utc>) -> Result<T, HubError>,
    {
        let attempts = self.config.max_commit_attempts.max(1);

        for attempt in 1..=attempts {
            let stored = self
                .store_call("load", self.store.load(id))
                .await?
                .ok_or(HubError::EventNotFound(id))?;

            let mut event = stored.event;
            let outcome = mutate(&mut event, self.clock.now())?;

            match self
                .store_call("replace", self.store.replace(event.clone(), stored.revision))
                .await
            {
                Ok(revision) => {
                    tracing::debug!(attempt, revision = %revision, "Committed");
                    return Ok((event, outcome));
                }
                Err(StoreError::Conflict { actual, .. }) => {
                    crate::metrics::record_commit_conflict();
                    tracing::debug!(
                        attempt,
                        expected = %stored.revision,
                        actual = %actual,
                        "Revision conflict, re-evaluating"
                    );
                }
                Err(error) => return Err(error.into()),
            }
        }

        tracing::warn!(attempts, "Giving up after repeated revision conflicts");
        Err(HubError::transient(format!(
            "event {id} kept changing; gave up after {attempts} attempts"
        )))
    }

    async fn store_call<T>(
        &self,
        operation: &'static str,
        call: StoreFuture<'_, T>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                let millis =
                    u64::try_from(self.config.store_timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(operation, millis, "Store call timed out");
                Err(StoreError::Timeout { operation, millis })
            }
        }
    }
}
