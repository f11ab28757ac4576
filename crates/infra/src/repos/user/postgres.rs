use super::IUserRepo;
use agenda_domain::{User, ID};
use sqlx::{FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_id: i64,
    first_name: String,
    last_name: Option<String>,
    email: Option<String>,
    role: String,
    status: String,
    created: i64,
    updated: i64,
}

impl TryFrom<UserRaw> for User {
    type Error = anyhow::Error;

    fn try_from(u: UserRaw) -> anyhow::Result<Self> {
        Ok(User {
            id: u.user_id.into(),
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            role: u.role.parse()?,
            status: u.status.parse()?,
            created: u.created,
            updated: u.updated,
        })
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<User> {
        let user_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users(first_name, last_name, email, role, status, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            RETURNING user_id
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.created)
        .bind(user.updated)
        .fetch_one(&self.pool)
        .await?;

        let mut user = user.clone();
        user.id = user_id.into();
        Ok(user)
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        let user: Option<UserRaw> = sqlx::query_as(
            r#"
            SELECT * FROM users AS u
            WHERE u.user_id = $1
            "#,
        )
        .bind(user_id.inner())
        .fetch_optional(&self.pool)
        .await?;
        user.map(User::try_from).transpose()
    }

    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>> {
        let ids = user_ids.iter().map(|id| id.inner()).collect::<Vec<_>>();
        let users: Vec<UserRaw> = sqlx::query_as(
            r#"
            SELECT * FROM users AS u
            WHERE u.user_id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        users.into_iter().map(User::try_from).collect()
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user: Option<UserRaw> = sqlx::query_as(
            r#"
            SELECT * FROM users AS u
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        user.map(User::try_from).transpose()
    }
}
