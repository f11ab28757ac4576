use crate::error::AgendaError;
use crate::shared::usecase::{execute, UseCase};
use agenda_domain::{Action, Event, Forbidden, User, ID};
use agenda_infra::AgendaContext;

/// Removes the `Event` and its roster. Requires the `delete` grant.
pub async fn delete_event(
    ctx: &AgendaContext,
    acting_user: &User,
    event_id: &ID,
) -> Result<Event, AgendaError> {
    let usecase = DeleteEventUseCase {
        user: acting_user.clone(),
        event_id: *event_id,
    };

    execute(usecase, ctx).await.map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct DeleteEventUseCase {
    pub user: User,
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    Forbidden(Forbidden),
    StorageError(String),
}

impl From<UseCaseError> for AgendaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::Forbidden(e) => e.into(),
            UseCaseError::StorageError(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteEventUseCase {
    type Response = Event;

    type Errors = UseCaseError;

    const NAME: &'static str = "DeleteEvent";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Errors> {
        let e = match ctx.repos.events.find(&self.event_id).await {
            Ok(Some(e)) => e,
            Ok(None) => return Err(UseCaseError::NotFound(self.event_id)),
            Err(e) => return Err(UseCaseError::StorageError(e.to_string())),
        };
        e.authorize(&self.user.id, Action::Delete)
            .map_err(UseCaseError::Forbidden)?;

        match ctx.repos.events.delete(&e.id).await {
            Ok(Some(deleted)) => Ok(deleted),
            // Removed by someone else in the meantime
            Ok(None) => Err(UseCaseError::NotFound(self.event_id)),
            Err(e) => Err(UseCaseError::StorageError(e.to_string())),
        }
    }
}
