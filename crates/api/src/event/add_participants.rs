use super::subscribers::WarnOnRosterDesync;
use crate::error::AgendaError;
use crate::shared::{
    usecase::{execute, Subscriber, UseCase},
    users::{find_missing_users, format_ids},
};
use agenda_domain::{Action, Event, Forbidden, ParticipantGrants, User, ID};
use agenda_infra::{AgendaContext, StaleEventError};
use tracing::warn;

/// Adds users to the roster of the `Event` and unions the given grants into
/// its permission map. Requires the `modify` grant.
pub async fn add_participants(
    ctx: &AgendaContext,
    acting_user: &User,
    event_id: &ID,
    participants: Vec<ParticipantGrants>,
) -> Result<Event, AgendaError> {
    let usecase = AddParticipantsUseCase {
        user: acting_user.clone(),
        event_id: *event_id,
        participants,
    };

    execute(usecase, ctx).await.map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct AddParticipantsUseCase {
    pub user: User,
    pub event_id: ID,
    pub participants: Vec<ParticipantGrants>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NoParticipants,
    NotFound(ID),
    UsersNotFound(Vec<ID>),
    Forbidden(Forbidden),
    /// Every attempt lost against a concurrent writer
    ConcurrentUpdate(ID),
    StorageError(String),
}

impl From<anyhow::Error> for UseCaseError {
    fn from(e: anyhow::Error) -> Self {
        Self::StorageError(e.to_string())
    }
}

impl From<UseCaseError> for AgendaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NoParticipants => {
                Self::BadClientData("At least one participant must be provided".into())
            }
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::UsersNotFound(user_ids) => Self::NotFound(format!(
                "The users with ids: {}, were not found.",
                format_ids(&user_ids)
            )),
            UseCaseError::Forbidden(e) => e.into(),
            UseCaseError::ConcurrentUpdate(event_id) => Self::Conflict(format!(
                "The event with id: {} kept being updated by someone else, try again later.",
                event_id
            )),
            UseCaseError::StorageError(_) => Self::InternalError,
        }
    }
}

impl AddParticipantsUseCase {
    async fn load_event(&self, ctx: &AgendaContext) -> Result<Event, UseCaseError> {
        let e = ctx
            .repos
            .events
            .find(&self.event_id)
            .await?
            .ok_or(UseCaseError::NotFound(self.event_id))?;
        e.authorize(&self.user.id, Action::Modify)
            .map_err(UseCaseError::Forbidden)?;
        Ok(e)
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for AddParticipantsUseCase {
    type Response = Event;

    type Errors = UseCaseError;

    const NAME: &'static str = "AddParticipants";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Errors> {
        if self.participants.is_empty() {
            return Err(UseCaseError::NoParticipants);
        }

        let mut e = self.load_event(ctx).await?;

        let user_ids = self
            .participants
            .iter()
            .map(|p| p.user_id)
            .collect::<Vec<_>>();
        let missing = find_missing_users(ctx, &user_ids).await?;
        if !missing.is_empty() {
            return Err(UseCaseError::UsersNotFound(missing));
        }

        let mut retries = 0;
        loop {
            e.add_participants(&self.participants);
            e.updated = ctx.sys.get_timestamp_millis();

            let err = match ctx.repos.events.save(&e).await {
                Ok(saved) => return Ok(saved),
                Err(err) => err,
            };
            if err.downcast_ref::<StaleEventError>().is_none() {
                return Err(err.into());
            }
            if retries >= ctx.config.max_save_retries {
                return Err(UseCaseError::ConcurrentUpdate(self.event_id));
            }
            retries += 1;
            warn!(
                "Event: {} was saved concurrently, retrying to add participants ({}/{})",
                self.event_id, retries, ctx.config.max_save_retries
            );
            // The concurrent writer may have revoked our grants or deleted the event
            e = self.load_event(ctx).await?;
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(WarnOnRosterDesync)]
    }
}
