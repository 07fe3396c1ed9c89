//! `PostgreSQL` event store for Volunteer Hub.
//!
//! Each event is one row: the document as JSONB plus the columns the store
//! needs without decoding it (`event_date` and `created_at` for listing,
//! `revision` for conditional replace).
//!
//! Replace is a single conditional statement:
//!
//! ```sql
//! UPDATE volunteer_events SET ..., revision = revision + 1
//! WHERE id = $1 AND revision = $2
//! ```
//!
//! so two writers that read the same revision can never both commit,
//! whichever server process they run in.
//!
//! # Example
//!
//! ```ignore
//! use volunteer_hub_postgres::PostgresEventStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresEventStore::connect(
//!         "postgres://localhost/volunteer_hub",
//!         10,
//!         std::time::Duration::from_secs(30),
//!     )
//!     .await?;
//!     store.migrate().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use volunteer_hub_core::error::StoreError;
use volunteer_hub_core::listing::EventQuery;
use volunteer_hub_core::store::{EventStore, StoreFuture, StoredEvent};
use volunteer_hub_core::types::{Event, EventId, Revision};

/// `PostgreSQL`-backed [`EventStore`].
#[derive(Clone, Debug)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    /// Connect a new pool.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the connection fails.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to connect: {e}")))?;

        Ok(Self::from_pool(pool))
    }

    /// Use an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `volunteer_events` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert_row(&self, event: Event) -> Result<Revision, StoreError> {
        let data = encode(&event)?;

        sqlx::query(
            r"
            INSERT INTO volunteer_events (id, revision, event_date, created_at, updated_at, data)
            VALUES ($1, 1, $2, $3, $4, $5)
            ",
        )
        .bind(event.id.as_uuid())
        .bind(event.date)
        .bind(event.created_at)
        .bind(event.updated_at)
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(database)?;

        tracing::debug!(event_id = %event.id, "Inserted event document");
        Ok(Revision::INITIAL)
    }

    async fn load_row(&self, id: EventId) -> Result<Option<StoredEvent>, StoreError> {
        let row: Option<(i64, JsonValue)> =
            sqlx::query_as("SELECT revision, data FROM volunteer_events WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(database)?;

        row.map(|(revision, data)| {
            Ok(StoredEvent {
                event: decode(data)?,
                revision: revision_from_db(revision)?,
            })
        })
        .transpose()
    }

    async fn query_rows(&self, query: EventQuery) -> Result<Vec<Event>, StoreError> {
        let order = query.order.as_sql();
        let sql = format!(
            "SELECT data FROM volunteer_events \
             WHERE ($1::timestamptz IS NULL OR event_date >= $1) \
             ORDER BY event_date {order}, created_at {order}, id {order}"
        );

        let rows: Vec<(JsonValue,)> = sqlx::query_as(&sql)
            .bind(query.not_before)
            .fetch_all(&self.pool)
            .await
            .map_err(database)?;

        rows.into_iter().map(|(data,)| decode(data)).collect()
    }

    async fn replace_row(&self, event: Event, expected: Revision) -> Result<Revision, StoreError> {
        let data = encode(&event)?;

        let updated: Option<(i64,)> = sqlx::query_as(
            r"
            UPDATE volunteer_events
            SET data = $3, event_date = $4, updated_at = $5, revision = revision + 1
            WHERE id = $1 AND revision = $2
            RETURNING revision
            ",
        )
        .bind(event.id.as_uuid())
        .bind(revision_to_db(expected)?)
        .bind(data)
        .bind(event.date)
        .bind(event.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(database)?;

        if let Some((revision,)) = updated {
            return revision_from_db(revision);
        }

        // Nothing matched: either the row is gone or someone else committed.
        let current: Option<(i64,)> =
            sqlx::query_as("SELECT revision FROM volunteer_events WHERE id = $1")
                .bind(event.id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(database)?;

        match current {
            None => Err(StoreError::NotFound(event.id)),
            Some((actual,)) => Err(StoreError::Conflict {
                event_id: event.id,
                expected,
                actual: revision_from_db(actual)?,
            }),
        }
    }

    async fn remove_row(&self, id: EventId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM volunteer_events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping_db(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(database)?;
        Ok(())
    }
}

impl EventStore for PostgresEventStore {
    fn insert(&self, event: Event) -> StoreFuture<'_, Revision> {
        Box::pin(self.insert_row(event))
    }

    fn load(&self, id: EventId) -> StoreFuture<'_, Option<StoredEvent>> {
        Box::pin(self.load_row(id))
    }

    fn query(&self, query: EventQuery) -> StoreFuture<'_, Vec<Event>> {
        Box::pin(self.query_rows(query))
    }

    fn replace(&self, event: Event, expected: Revision) -> StoreFuture<'_, Revision> {
        Box::pin(self.replace_row(event, expected))
    }

    fn remove(&self, id: EventId) -> StoreFuture<'_, bool> {
        Box::pin(self.remove_row(id))
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(self.ping_db())
    }
}

#[allow(clippy::needless_pass_by_value)] // used as `map_err(database)`
fn database(error: sqlx::Error) -> StoreError {
    StoreError::Database(error.to_string())
}

fn encode(event: &Event) -> Result<JsonValue, StoreError> {
    serde_json::to_value(event).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode(data: JsonValue) -> Result<Event, StoreError> {
    serde_json::from_value(data).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn revision_from_db(value: i64) -> Result<Revision, StoreError> {
    u64::try_from(value)
        .map(Revision::new)
        .map_err(|_| StoreError::Serialization(format!("negative revision {value}")))
}

fn revision_to_db(revision: Revision) -> Result<i64, StoreError> {
    i64::try_from(revision.value())
        .map_err(|_| StoreError::Serialization(format!("revision {revision} out of range")))
}
