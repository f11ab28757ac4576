use super::subscribers::WarnOnRosterDesync;
use crate::error::AgendaError;
use crate::shared::{
    usecase::{execute, Subscriber, UseCase},
    users::{find_missing_users, format_ids},
};
use agenda_domain::{Event, EventCategory, Permissions, User, ID};
use agenda_infra::AgendaContext;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventInput {
    pub title: String,
    pub start_ts: i64,
    pub end_ts: i64,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_pattern: String,
    /// Added to the roster next to the creator
    #[serde(default)]
    pub participants: Vec<ID>,
    pub permissions: Option<Permissions>,
}

/// Creates an `Event` with `acting_user` as its first participant holding `all`
pub async fn create_event(
    ctx: &AgendaContext,
    acting_user: &User,
    input: CreateEventInput,
) -> Result<Event, AgendaError> {
    let usecase = CreateEventUseCase {
        user: acting_user.clone(),
        input,
    };

    execute(usecase, ctx).await.map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub user: User,
    pub input: CreateEventInput,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    UsersNotFound(Vec<ID>),
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
            UseCaseError::UsersNotFound(user_ids) => Self::NotFound(format!(
                "The users with ids: {}, were not found.",
                format_ids(&user_ids)
            )),
            UseCaseError::StorageError(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateEventUseCase {
    type Response = Event;

    type Errors = UseCaseError;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Errors> {
        let input = self.input.clone();

        let missing = find_missing_users(ctx, &input.participants).await?;
        if !missing.is_empty() {
            return Err(UseCaseError::UsersNotFound(missing));
        }

        let now = ctx.sys.get_timestamp_millis();
        let mut e = Event {
            id: Default::default(),
            title: input.title,
            start_ts: input.start_ts,
            end_ts: input.end_ts,
            category: input.category,
            description: input.description,
            location: input.location,
            is_recurring: input.is_recurring,
            recurrence_pattern: input.recurrence_pattern,
            participants: input.participants.into_iter().collect(),
            permissions: input.permissions.unwrap_or_default(),
            version: 0,
            created: now,
            updated: now,
        };
        // The creator can never lock itself out, whatever permissions were given
        e.add_owner(self.user.id);

        let e = ctx.repos.events.insert(&e).await?;
        Ok(e)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(WarnOnRosterDesync)]
    }
}
