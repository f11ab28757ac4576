use crate::shared::usecase::{Subscriber, UseCase};
use agenda_domain::Event;
use agenda_infra::AgendaContext;
use tracing::warn;

/// Warns when the roster and the permission map of a written `Event` disagree.
/// Nothing is repaired.
pub struct WarnOnRosterDesync;

#[async_trait::async_trait(?Send)]
impl<U> Subscriber<U> for WarnOnRosterDesync
where
    U: UseCase<Response = Event>,
{
    async fn notify(&self, e: &Event, _ctx: &AgendaContext) {
        if let Some(desync) = e.roster_desync() {
            warn!(
                "Roster and permissions of event: {} disagree. Grants without participant: {:?}, participants without grants: {:?}",
                e.id, desync.grants_without_participant, desync.participants_without_grants
            );
        }
    }
}
