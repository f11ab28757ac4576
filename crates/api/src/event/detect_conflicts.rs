use crate::error::AgendaError;
use crate::shared::{
    usecase::{execute, UseCase},
    users::{find_missing_users, format_ids},
};
use agenda_domain::{filter_conflicting_events, ConflictReport, TimeSpan, User, ID};
use agenda_infra::AgendaContext;
use futures::future::join_all;
use itertools::Itertools;
use tracing::debug;

/// Finds, for each of `user_ids`, the `Event`s overlapping `[start_ts, end_ts]`.
/// Touching endpoints count as an overlap.
pub async fn detect_conflicts(
    ctx: &AgendaContext,
    acting_user: &User,
    user_ids: Vec<ID>,
    start_ts: i64,
    end_ts: i64,
    exclude_event_id: Option<ID>,
) -> Result<ConflictReport, AgendaError> {
    let usecase = DetectConflictsUseCase {
        user: acting_user.clone(),
        user_ids,
        start_ts,
        end_ts,
        exclude_event_id,
    };

    execute(usecase, ctx).await.map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct DetectConflictsUseCase {
    pub user: User,
    pub user_ids: Vec<ID>,
    pub start_ts: i64,
    pub end_ts: i64,
    /// The `Event` being rescheduled, never reported against itself
    pub exclude_event_id: Option<ID>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NoUsers,
    InvalidTimespan(i64, i64),
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
            UseCaseError::NoUsers => {
                Self::BadClientData("At least one user id must be provided".into())
            }
            UseCaseError::InvalidTimespan(start_ts, end_ts) => Self::BadClientData(format!(
                "The start: {} must not be after the end: {}",
                start_ts, end_ts
            )),
            UseCaseError::UsersNotFound(user_ids) => Self::NotFound(format!(
                "The users with ids: {}, were not found.",
                format_ids(&user_ids)
            )),
            UseCaseError::StorageError(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DetectConflictsUseCase {
    type Response = ConflictReport;

    type Errors = UseCaseError;

    const NAME: &'static str = "DetectConflicts";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Errors> {
        if self.user_ids.is_empty() {
            return Err(UseCaseError::NoUsers);
        }
        let window = TimeSpan::create(self.start_ts, self.end_ts)
            .map_err(|_| UseCaseError::InvalidTimespan(self.start_ts, self.end_ts))?;

        let user_ids = self.user_ids.iter().cloned().unique().collect::<Vec<_>>();
        let missing = find_missing_users(ctx, &user_ids).await?;
        if !missing.is_empty() {
            return Err(UseCaseError::UsersNotFound(missing));
        }
        debug!(
            "User: {} is checking conflicts of {} users in {}",
            self.user.id,
            user_ids.len(),
            window
        );

        let events_per_user = join_all(
            user_ids
                .iter()
                .map(|user_id| ctx.repos.events.find_by_participant(user_id)),
        )
        .await;

        let mut report = ConflictReport::new();
        for (user_id, events) in user_ids.into_iter().zip(events_per_user) {
            let conflicts =
                filter_conflicting_events(events?, &window, self.exclude_event_id.as_ref());
            report.record(user_id, conflicts);
        }
        Ok(report)
    }
}
