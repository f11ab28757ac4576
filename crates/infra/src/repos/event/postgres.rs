use super::{IEventRepo, StaleEventError};
use crate::repos::shared::query_structs::{EventsQuery, ParticipantEventsQuery};
use agenda_domain::{Event, Permissions, Roster, ID};
use sqlx::{types::Json, FromRow, PgPool, Postgres, Transaction};
use std::convert::TryFrom;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_id: i64,
    title: String,
    start_ts: i64,
    end_ts: i64,
    category: String,
    description: String,
    location: String,
    is_recurring: bool,
    recurrence_pattern: String,
    permissions: Option<serde_json::Value>,
    version: i64,
    created: i64,
    updated: i64,
    participants: Vec<i64>,
}

impl TryFrom<EventRaw> for Event {
    type Error = anyhow::Error;

    fn try_from(e: EventRaw) -> anyhow::Result<Self> {
        let permissions: Permissions = match e.permissions {
            Some(permissions) => serde_json::from_value(permissions)?,
            None => Default::default(),
        };
        Ok(Event {
            id: e.event_id.into(),
            title: e.title,
            start_ts: e.start_ts,
            end_ts: e.end_ts,
            category: e.category.parse()?,
            description: e.description,
            location: e.location,
            is_recurring: e.is_recurring,
            recurrence_pattern: e.recurrence_pattern,
            participants: e.participants.into_iter().map(ID::from).collect::<Roster>(),
            permissions,
            version: e.version,
            created: e.created,
            updated: e.updated,
        })
    }
}

fn to_events(rows: Vec<EventRaw>) -> anyhow::Result<Vec<Event>> {
    rows.into_iter().map(Event::try_from).collect()
}

// Offsets past `i64::MAX` cannot match any row
fn to_offset(skip: usize) -> i64 {
    i64::try_from(skip).unwrap_or(i64::MAX)
}

fn to_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn participant_ids(e: &Event) -> Vec<i64> {
    e.participants.iter().map(|id| id.inner()).collect()
}

// Every read goes through this projection so that the roster is loaded with the event
const SELECT_EVENTS: &str = r#"
    SELECT e.*, COALESCE(
        ARRAY_AGG(p.user_id) FILTER (WHERE p.user_id IS NOT NULL), '{}'
    ) AS participants
    FROM events AS e
    LEFT JOIN event_participants AS p ON p.event_id = e.event_id
"#;

async fn replace_participants(
    tx: &mut Transaction<'_, Postgres>,
    e: &Event,
    event_id: i64,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        DELETE FROM event_participants
        WHERE event_id = $1
        "#,
    )
    .bind(event_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO event_participants(event_id, user_id)
        SELECT $1, UNNEST($2::BIGINT[])
        "#,
    )
    .bind(event_id)
    .bind(participant_ids(e))
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<Event> {
        let mut tx = self.pool.begin().await?;

        let event_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO events(
                title,
                start_ts,
                end_ts,
                category,
                description,
                location,
                is_recurring,
                recurrence_pattern,
                permissions,
                version,
                created,
                updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING event_id
            "#,
        )
        .bind(&e.title)
        .bind(e.start_ts)
        .bind(e.end_ts)
        .bind(e.category.as_str())
        .bind(&e.description)
        .bind(&e.location)
        .bind(e.is_recurring)
        .bind(&e.recurrence_pattern)
        .bind(Json(&e.permissions))
        .bind(e.version)
        .bind(e.created)
        .bind(e.updated)
        .fetch_one(&mut *tx)
        .await?;

        replace_participants(&mut tx, e, event_id).await?;
        tx.commit().await?;

        let mut e = e.clone();
        e.id = event_id.into();
        Ok(e)
    }

    async fn save(&self, e: &Event) -> anyhow::Result<Event> {
        let mut tx = self.pool.begin().await?;

        let version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE events SET
                title = $3,
                start_ts = $4,
                end_ts = $5,
                category = $6,
                description = $7,
                location = $8,
                is_recurring = $9,
                recurrence_pattern = $10,
                permissions = $11,
                created = $12,
                updated = $13,
                version = version + 1
            WHERE event_id = $1 AND version = $2
            RETURNING version
            "#,
        )
        .bind(e.id.inner())
        .bind(e.version)
        .bind(&e.title)
        .bind(e.start_ts)
        .bind(e.end_ts)
        .bind(e.category.as_str())
        .bind(&e.description)
        .bind(&e.location)
        .bind(e.is_recurring)
        .bind(&e.recurrence_pattern)
        .bind(Json(&e.permissions))
        .bind(e.created)
        .bind(e.updated)
        .fetch_optional(&mut *tx)
        .await?;

        let version = match version {
            Some(version) => version,
            None => {
                tx.rollback().await?;
                return Err(StaleEventError {
                    event_id: e.id,
                    expected_version: e.version,
                }
                .into());
            }
        };

        replace_participants(&mut tx, e, e.id.inner()).await?;
        tx.commit().await?;

        let mut e = e.clone();
        e.version = version;
        Ok(e)
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        let query = format!(
            "{} WHERE e.event_id = $1 GROUP BY e.event_id",
            SELECT_EVENTS
        );
        let event: Option<EventRaw> = sqlx::query_as(&query)
            .bind(event_id.inner())
            .fetch_optional(&self.pool)
            .await?;
        event.map(Event::try_from).transpose()
    }

    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Event>> {
        let ids = event_ids.iter().map(|id| id.inner()).collect::<Vec<_>>();
        let query = format!(
            "{} WHERE e.event_id = ANY($1) GROUP BY e.event_id",
            SELECT_EVENTS
        );
        let events: Vec<EventRaw> = sqlx::query_as(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        to_events(events)
    }

    async fn find_by_participant(&self, user_id: &ID) -> anyhow::Result<Vec<Event>> {
        let query = format!(
            r#"{}
            WHERE e.event_id IN (
                SELECT event_id FROM event_participants WHERE user_id = $1
            )
            GROUP BY e.event_id
            ORDER BY e.start_ts, e.event_id
            "#,
            SELECT_EVENTS
        );
        let events: Vec<EventRaw> = sqlx::query_as(&query)
            .bind(user_id.inner())
            .fetch_all(&self.pool)
            .await?;
        to_events(events)
    }

    async fn find_by_participant_paginated(
        &self,
        query: ParticipantEventsQuery,
    ) -> anyhow::Result<Vec<Event>> {
        let sql = format!(
            r#"{}
            WHERE e.event_id IN (
                SELECT event_id FROM event_participants WHERE user_id = $1
            )
            GROUP BY e.event_id
            ORDER BY e.start_ts, e.event_id
            LIMIT $3
            OFFSET $2
            "#,
            SELECT_EVENTS
        );
        let events: Vec<EventRaw> = sqlx::query_as(&sql)
            .bind(query.user_id.inner())
            .bind(to_offset(query.skip))
            .bind(to_limit(query.limit))
            .fetch_all(&self.pool)
            .await?;
        to_events(events)
    }

    async fn find_paginated(&self, query: EventsQuery) -> anyhow::Result<Vec<Event>> {
        let sql = format!(
            r#"{}
            GROUP BY e.event_id
            ORDER BY e.start_ts, e.event_id
            LIMIT $2
            OFFSET $1
            "#,
            SELECT_EVENTS
        );
        let events: Vec<EventRaw> = sqlx::query_as(&sql)
            .bind(to_offset(query.skip))
            .bind(to_limit(query.limit))
            .fetch_all(&self.pool)
            .await?;
        to_events(events)
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        let event = match self.find(event_id).await? {
            Some(event) => event,
            None => return Ok(None),
        };

        // Participants are removed by the cascading foreign key
        let res = sqlx::query(
            r#"
            DELETE FROM events
            WHERE event_id = $1
            "#,
        )
        .bind(event_id.inner())
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(event))
    }
}
