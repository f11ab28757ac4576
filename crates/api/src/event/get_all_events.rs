use super::pagination::{EventsPage, PageWindow, Pagination, PaginationError};
use crate::error::AgendaError;
use crate::shared::usecase::{execute, UseCase};
use agenda_domain::{Role, User, ID};
use agenda_infra::{AgendaContext, EventsQuery};

/// Every stored `Event` ordered by start time. Only admins may list them,
/// since the listing skips the per event read grants.
pub async fn get_all_events(
    ctx: &AgendaContext,
    acting_user: &User,
    pagination: Pagination,
) -> Result<EventsPage, AgendaError> {
    let usecase = GetAllEventsUseCase {
        user: acting_user.clone(),
        pagination,
    };

    execute(usecase, ctx).await.map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct GetAllEventsUseCase {
    pub user: User,
    pub pagination: Pagination,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotAdmin(ID),
    InvalidPage,
    InvalidLimit,
    StorageError(String),
}

impl From<PaginationError> for UseCaseError {
    fn from(e: PaginationError) -> Self {
        match e {
            PaginationError::InvalidPage => Self::InvalidPage,
            PaginationError::InvalidLimit => Self::InvalidLimit,
        }
    }
}

impl From<UseCaseError> for AgendaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotAdmin(user_id) => Self::Forbidden(format!(
                "The user with id: {}, is not allowed to list every event.",
                user_id
            )),
            UseCaseError::InvalidPage => {
                Self::BadClientData("The page must be at least 1 and address stored rows".into())
            }
            UseCaseError::InvalidLimit => {
                Self::BadClientData("The limit must be at least 1".into())
            }
            UseCaseError::StorageError(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAllEventsUseCase {
    type Response = EventsPage;

    type Errors = UseCaseError;

    const NAME: &'static str = "GetAllEvents";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Errors> {
        if self.user.role != Role::Admin {
            return Err(UseCaseError::NotAdmin(self.user.id));
        }
        let window = PageWindow::create(&self.pagination, &ctx.config)?;

        let query = EventsQuery {
            skip: window.skip,
            limit: window.fetch_limit(),
        };
        ctx.repos
            .events
            .find_paginated(query)
            .await
            .map(|events| window.page_of(events))
            .map_err(|e| UseCaseError::StorageError(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::create_event::{create_event, CreateEventInput};

    async fn insert_admin(ctx: &AgendaContext) -> User {
        let mut admin = User::new("Ada");
        admin.role = Role::Admin;
        ctx.repos.users.insert(&admin).await.unwrap()
    }

    #[tokio::test]
    async fn admins_list_events_of_every_user() {
        let mut ctx = AgendaContext::create_inmemory();
        ctx.config.default_events_page_size = 2;
        let admin = insert_admin(&ctx).await;
        let john = ctx.repos.users.insert(&User::new("John")).await.unwrap();
        let jane = ctx.repos.users.insert(&User::new("Jane")).await.unwrap();

        let mut events = Vec::new();
        for (i, user) in [&john, &jane, &john].iter().enumerate() {
            let start_ts = i as i64 * 1000;
            let e = create_event(
                &ctx,
                user,
                CreateEventInput {
                    title: format!("Event {}", i),
                    start_ts,
                    end_ts: start_ts + 500,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
            events.push(e);
        }

        let first = get_all_events(&ctx, &admin, Pagination::default())
            .await
            .unwrap();
        assert_eq!(first.events, events[..2].to_vec());
        assert!(first.has_next_page);

        let second = get_all_events(
            &ctx,
            &admin,
            Pagination {
                page: Some(2),
                limit: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(second.events, events[2..].to_vec());
        assert!(!second.has_next_page);
    }

    #[tokio::test]
    async fn rejects_users_that_are_not_admins() {
        let ctx = AgendaContext::create_inmemory();
        let user = ctx.repos.users.insert(&User::new("John")).await.unwrap();

        let mut usecase = GetAllEventsUseCase {
            user: user.clone(),
            pagination: Pagination::default(),
        };
        assert_eq!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotAdmin(user.id))
        );
        let res = get_all_events(&ctx, &user, Pagination::default()).await;
        assert!(matches!(res, Err(AgendaError::Forbidden(_))));
    }

    #[tokio::test]
    async fn rejects_pages_past_the_last_addressable_row() {
        let ctx = AgendaContext::create_inmemory();
        let admin = insert_admin(&ctx).await;

        let mut usecase = GetAllEventsUseCase {
            user: admin,
            pagination: Pagination {
                page: Some(usize::MAX),
                limit: None,
            },
        };
        assert_eq!(usecase.execute(&ctx).await, Err(UseCaseError::InvalidPage));
    }
}
