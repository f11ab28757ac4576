mod inmemory;
mod postgres;

use crate::repos::shared::query_structs::{EventsQuery, ParticipantEventsQuery};
use agenda_domain::{Event, ID};
pub use inmemory::InMemoryEventRepo;
pub use postgres::PostgresEventRepo;
use thiserror::Error;

/// The stored `Event` was changed or removed after it was loaded.
/// Reload and reapply the change to retry.
#[derive(Error, Debug, PartialEq)]
#[error("Event with id: {event_id} was modified concurrently, expected version: {expected_version}")]
pub struct StaleEventError {
    pub event_id: ID,
    pub expected_version: i64,
}

#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    /// Stores a new `Event` together with its roster and returns it with the id
    /// assigned by the store
    async fn insert(&self, e: &Event) -> anyhow::Result<Event>;
    /// Replaces the stored `Event` (roster and permissions included) in one atomic
    /// write. Fails with `StaleEventError` when the stored version is not `e.version`.
    /// Returns the saved `Event` with its new version.
    async fn save(&self, e: &Event) -> anyhow::Result<Event>;
    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<Event>>;
    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Event>>;
    async fn find_by_participant(&self, user_id: &ID) -> anyhow::Result<Vec<Event>>;
    async fn find_by_participant_paginated(
        &self,
        query: ParticipantEventsQuery,
    ) -> anyhow::Result<Vec<Event>>;
    async fn find_paginated(&self, query: EventsQuery) -> anyhow::Result<Vec<Event>>;
    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<Event>>;
}
