mod inmemory;
mod postgres;

use agenda_domain::{User, ID};
pub use inmemory::InMemoryUserRepo;
pub use postgres::PostgresUserRepo;

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    /// Stores a new `User` and returns it with the id assigned by the store
    async fn insert(&self, user: &User) -> anyhow::Result<User>;
    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>>;
    /// Ids without a matching `User` are skipped, so the result may be shorter than `user_ids`
    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
}

#[cfg(test)]
mod tests {
    use crate::repos::Repos;
    use agenda_domain::{User, ID};

    #[tokio::test]
    async fn insert_and_find() {
        let repos = Repos::create_inmemory();

        let mut user = User::new("John");
        user.email = Some("john.doe@example.com".into());
        let user = repos.users.insert(&user).await.expect("To insert user");
        let other = repos
            .users
            .insert(&User::new("Jane"))
            .await
            .expect("To insert user");
        assert_ne!(user.id, other.id);

        assert_eq!(repos.users.find(&user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            repos
                .users
                .find_by_email("john.doe@example.com")
                .await
                .unwrap(),
            Some(user.clone())
        );
        assert!(repos
            .users
            .find_by_email("jane@example.com")
            .await
            .unwrap()
            .is_none());

        let found = repos
            .users
            .find_many(&[user.id, ID::new(999), other.id])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.contains(&user));
        assert!(found.contains(&other));
    }
}
