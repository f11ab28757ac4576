use agenda_domain::ID;

/// Page of the `Event`s a `User` participates in, ordered by start time
#[derive(Debug, Clone)]
pub struct ParticipantEventsQuery {
    pub user_id: ID,
    pub skip: usize,
    pub limit: usize,
}

/// Page of every stored `Event`, ordered by start time
#[derive(Debug, Clone)]
pub struct EventsQuery {
    pub skip: usize,
    pub limit: usize,
}
