use super::pagination::{EventsPage, PageWindow, Pagination, PaginationError};
use crate::error::AgendaError;
use crate::shared::usecase::{execute, UseCase};
use agenda_domain::User;
use agenda_infra::{AgendaContext, ParticipantEventsQuery};

/// The `Event`s `acting_user` participates in, ordered by start time
pub async fn get_my_events(
    ctx: &AgendaContext,
    acting_user: &User,
    pagination: Pagination,
) -> Result<EventsPage, AgendaError> {
    let usecase = GetMyEventsUseCase {
        user: acting_user.clone(),
        pagination,
    };

    execute(usecase, ctx).await.map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct GetMyEventsUseCase {
    pub user: User,
    pub pagination: Pagination,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
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
impl UseCase for GetMyEventsUseCase {
    type Response = EventsPage;

    type Errors = UseCaseError;

    const NAME: &'static str = "GetMyEvents";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Errors> {
        let window = PageWindow::create(&self.pagination, &ctx.config)?;

        let query = ParticipantEventsQuery {
            user_id: self.user.id,
            skip: window.skip,
            limit: window.fetch_limit(),
        };
        ctx.repos
            .events
            .find_by_participant_paginated(query)
            .await
            .map(|events| window.page_of(events))
            .map_err(|e| UseCaseError::StorageError(e.to_string()))
    }
}
