use crate::{event::Event, shared::entity::ID, timespan::TimeSpan};
use serde::Serialize;
use std::collections::BTreeMap;

/// For every `User` with at least one `Event` overlapping a proposed `TimeSpan`,
/// the overlapping events of that user. Users without conflicts have no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConflictReport(BTreeMap<ID, Vec<Event>>);

impl ConflictReport {
    pub fn new() -> Self {
        Default::default()
    }

    /// Ignored when `conflicts` is empty
    pub fn record(&mut self, user_id: ID, conflicts: Vec<Event>) {
        if !conflicts.is_empty() {
            self.0.entry(user_id).or_default().extend(conflicts);
        }
    }

    pub fn get(&self, user_id: &ID) -> Option<&[Event]> {
        self.0.get(user_id).map(|events| events.as_slice())
    }

    pub fn user_ids(&self) -> impl Iterator<Item = &ID> {
        self.0.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> BTreeMap<ID, Vec<Event>> {
        self.0
    }
}

/// Keeps the events overlapping `window`, skipping `exclude_event_id` so an
/// event being rescheduled does not conflict with itself
pub fn filter_conflicting_events(
    events: Vec<Event>,
    window: &TimeSpan,
    exclude_event_id: Option<&ID>,
) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| Some(&event.id) != exclude_event_id)
        .filter(|event| event.overlaps(window))
        .collect()
}
