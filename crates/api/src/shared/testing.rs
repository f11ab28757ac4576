use agenda_domain::{Event, ID};
use agenda_infra::{AgendaContext, EventsQuery, IEventRepo, ParticipantEventsQuery};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const CONCURRENT_TITLE: &str = "Renamed concurrently";

/// Lets another writer save the event right before each of the
/// first `races` saves go through
pub struct RacingEventRepo {
    inner: Arc<dyn IEventRepo>,
    races: AtomicUsize,
}

#[async_trait::async_trait]
impl IEventRepo for RacingEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<Event> {
        self.inner.insert(e).await
    }

    async fn save(&self, e: &Event) -> anyhow::Result<Event> {
        if self.races.load(Ordering::SeqCst) > 0 {
            self.races.fetch_sub(1, Ordering::SeqCst);
            if let Some(mut current) = self.inner.find(&e.id).await? {
                current.title = CONCURRENT_TITLE.into();
                self.inner.save(&current).await?;
            }
        }
        self.inner.save(e).await
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        self.inner.find(event_id).await
    }

    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Event>> {
        self.inner.find_many(event_ids).await
    }

    async fn find_by_participant(&self, user_id: &ID) -> anyhow::Result<Vec<Event>> {
        self.inner.find_by_participant(user_id).await
    }

    async fn find_by_participant_paginated(
        &self,
        query: ParticipantEventsQuery,
    ) -> anyhow::Result<Vec<Event>> {
        self.inner.find_by_participant_paginated(query).await
    }

    async fn find_paginated(&self, query: EventsQuery) -> anyhow::Result<Vec<Event>> {
        self.inner.find_paginated(query).await
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        self.inner.delete(event_id).await
    }
}

/// Copy of `ctx` whose event store loses the first `races` saves
pub fn with_races(ctx: &AgendaContext, races: usize, max_save_retries: usize) -> AgendaContext {
    let mut ctx = ctx.clone();
    ctx.repos.events = Arc::new(RacingEventRepo {
        inner: ctx.repos.events.clone(),
        races: AtomicUsize::new(races),
    });
    ctx.config.max_save_retries = max_save_retries;
    ctx
}
