use super::subscribers::WarnOnRosterDesync;
use crate::error::AgendaError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use agenda_domain::{Action, Event, EventPatch, Forbidden, User, ID};
use agenda_infra::{AgendaContext, StaleEventError};

/// Applies `patch` to the `Event`. Requires the `modify` grant.
pub async fn update_event(
    ctx: &AgendaContext,
    acting_user: &User,
    event_id: &ID,
    patch: EventPatch,
) -> Result<Event, AgendaError> {
    let usecase = UpdateEventUseCase {
        user: acting_user.clone(),
        event_id: *event_id,
        patch,
    };

    execute(usecase, ctx).await.map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct UpdateEventUseCase {
    pub user: User,
    pub event_id: ID,
    pub patch: EventPatch,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    Forbidden(Forbidden),
    /// Someone else saved the `Event` between our read and write
    ConcurrentUpdate(ID),
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
            UseCaseError::ConcurrentUpdate(event_id) => Self::Conflict(format!(
                "The event with id: {} was updated by someone else, reload it and try again.",
                event_id
            )),
            UseCaseError::StorageError(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateEventUseCase {
    type Response = Event;

    type Errors = UseCaseError;

    const NAME: &'static str = "UpdateEvent";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Errors> {
        let UpdateEventUseCase {
            user,
            event_id,
            patch,
        } = self;

        let mut e = match ctx.repos.events.find(event_id).await {
            Ok(Some(e)) => e,
            Ok(None) => return Err(UseCaseError::NotFound(*event_id)),
            Err(e) => return Err(UseCaseError::StorageError(e.to_string())),
        };
        e.authorize(&user.id, Action::Modify)
            .map_err(UseCaseError::Forbidden)?;

        e.apply_patch(patch.clone());
        e.updated = ctx.sys.get_timestamp_millis();

        ctx.repos.events.save(&e).await.map_err(|err| {
            if err.downcast_ref::<StaleEventError>().is_some() {
                UseCaseError::ConcurrentUpdate(*event_id)
            } else {
                UseCaseError::StorageError(err.to_string())
            }
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(WarnOnRosterDesync)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::create_event::{create_event, CreateEventInput};
    use crate::shared::testing::{with_races, CONCURRENT_TITLE};
    use agenda_domain::{EventCategory, Grant, Permissions};

    struct TestContext {
        ctx: AgendaContext,
        owner: User,
        reader: User,
        event: Event,
    }

    async fn setup() -> TestContext {
        let ctx = AgendaContext::create_inmemory();
        let owner = ctx.repos.users.insert(&User::new("John")).await.unwrap();
        let reader = ctx.repos.users.insert(&User::new("Jane")).await.unwrap();
        let mut permissions = Permissions::new();
        permissions.grant(reader.id, vec![Grant::Read]);
        let event = create_event(
            &ctx,
            &owner,
            CreateEventInput {
                title: "Team Meeting".into(),
                start_ts: 1000,
                end_ts: 2000,
                participants: vec![reader.id],
                permissions: Some(permissions),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        TestContext {
            ctx,
            owner,
            reader,
            event,
        }
    }

    #[tokio::test]
    async fn applies_patch() {
        let TestContext {
            ctx, owner, event, ..
        } = setup().await;

        let patch = EventPatch {
            title: Some("Team Building Retreat".into()),
            category: Some(EventCategory::Project),
            ..Default::default()
        };
        let updated = update_event(&ctx, &owner, &event.id, patch).await.unwrap();

        assert_eq!(updated.title, "Team Building Retreat");
        assert_eq!(updated.category, EventCategory::Project);
        assert_eq!(updated.start_ts, event.start_ts);
        assert_eq!(updated.participants, event.participants);
        assert_eq!(updated.version, event.version + 1);
        assert_eq!(
            ctx.repos.events.find(&event.id).await.unwrap(),
            Some(updated)
        );
    }

    #[tokio::test]
    async fn patch_replaces_permissions() {
        let TestContext {
            ctx,
            owner,
            reader,
            event,
        } = setup().await;

        let mut permissions = Permissions::new();
        permissions.grant(owner.id, vec![Grant::All]);
        permissions.grant(reader.id, vec![Grant::Modify]);
        let patch = EventPatch {
            permissions: Some(permissions.clone()),
            ..Default::default()
        };
        let updated = update_event(&ctx, &owner, &event.id, patch).await.unwrap();
        assert_eq!(updated.permissions, permissions);

        // The reader may now modify, but a patch cannot touch the roster
        assert!(serde_json::from_str::<EventPatch>(r#"{ "participants": [999] }"#).is_err());
        let patch: EventPatch = serde_json::from_str(r#"{ "location": "Room 2" }"#).unwrap();
        let updated = update_event(&ctx, &reader, &event.id, patch).await.unwrap();
        assert_eq!(updated.location, "Room 2");
        assert_eq!(updated.participants, event.participants);
    }

    #[tokio::test]
    async fn rejects_users_without_modify_grant() {
        let TestContext {
            ctx, reader, event, ..
        } = setup().await;

        let mut usecase = UpdateEventUseCase {
            user: reader.clone(),
            event_id: event.id,
            patch: EventPatch {
                title: Some("Hijacked".into()),
                ..Default::default()
            },
        };
        assert_eq!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::Forbidden(Forbidden {
                user_id: reader.id,
                action: Action::Modify
            }))
        );
        assert_eq!(
            ctx.repos.events.find(&event.id).await.unwrap(),
            Some(event)
        );
    }

    #[tokio::test]
    async fn update_nonexisting_event() {
        let TestContext { ctx, owner, .. } = setup().await;

        let res = update_event(&ctx, &owner, &ID::new(42), Default::default()).await;
        assert!(matches!(res, Err(AgendaError::NotFound(_))));
    }

    #[tokio::test]
    async fn stale_save_is_a_conflict() {
        let TestContext {
            ctx, owner, event, ..
        } = setup().await;
        let ctx = with_races(&ctx, 1, 3);

        let mut usecase = UpdateEventUseCase {
            user: owner.clone(),
            event_id: event.id,
            patch: EventPatch {
                location: Some("Room 2".into()),
                ..Default::default()
            },
        };
        assert_eq!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::ConcurrentUpdate(event.id))
        );

        // The other writer's rename is kept and the patch is not replayed
        let stored = ctx.repos.events.find(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.title, CONCURRENT_TITLE);
        assert_eq!(stored.location, event.location);
        assert_eq!(stored.version, event.version + 1);

        let ctx = with_races(&ctx, 1, 3);
        let patch = EventPatch {
            location: Some("Room 3".into()),
            ..Default::default()
        };
        let res = update_event(&ctx, &owner, &event.id, patch).await;
        assert!(matches!(res, Err(AgendaError::Conflict(_))));
    }
}
