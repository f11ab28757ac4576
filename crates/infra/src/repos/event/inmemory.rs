use super::{IEventRepo, StaleEventError};
use crate::repos::shared::{
    inmemory_repo::*,
    query_structs::{EventsQuery, ParticipantEventsQuery},
};
use agenda_domain::{Event, ID};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

pub struct InMemoryEventRepo {
    events: Mutex<Vec<Event>>,
    last_id: AtomicI64,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            last_id: AtomicI64::new(0),
        }
    }
}

fn sort_by_start(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by_key(|e| (e.start_ts, e.id));
    events
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<Event> {
        let mut e = e.clone();
        e.id = ID::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        insert(&e, &self.events);
        Ok(e)
    }

    async fn save(&self, e: &Event) -> anyhow::Result<Event> {
        let mut events = lock(&self.events);
        let stale = || StaleEventError {
            event_id: e.id,
            expected_version: e.version,
        };
        let stored = events
            .iter_mut()
            .find(|stored| stored.id == e.id)
            .ok_or_else(stale)?;
        if stored.version != e.version {
            return Err(stale().into());
        }

        let mut saved = e.clone();
        saved.version += 1;
        *stored = saved.clone();
        Ok(saved)
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        Ok(find(event_id, &self.events))
    }

    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Event>> {
        let res = find_by(&self.events, |event| event_ids.contains(&event.id));
        Ok(res)
    }

    async fn find_by_participant(&self, user_id: &ID) -> anyhow::Result<Vec<Event>> {
        let res = find_by(&self.events, |event| event.is_participant(user_id));
        Ok(sort_by_start(res))
    }

    async fn find_by_participant_paginated(
        &self,
        query: ParticipantEventsQuery,
    ) -> anyhow::Result<Vec<Event>> {
        let res = find_by(&self.events, |event| event.is_participant(&query.user_id));
        Ok(sort_by_start(res)
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .collect())
    }

    async fn find_paginated(&self, query: EventsQuery) -> anyhow::Result<Vec<Event>> {
        let res = find_by(&self.events, |_| true);
        Ok(sort_by_start(res)
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .collect())
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        Ok(delete(event_id, &self.events))
    }
}
