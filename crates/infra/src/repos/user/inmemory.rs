use super::IUserRepo;
use crate::repos::shared::inmemory_repo::*;
use agenda_domain::{User, ID};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

pub struct InMemoryUserRepo {
    users: Mutex<Vec<User>>,
    last_id: AtomicI64,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(vec![]),
            last_id: AtomicI64::new(0),
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for InMemoryUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<User> {
        let mut user = user.clone();
        user.id = ID::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        insert(&user, &self.users);
        Ok(user)
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        Ok(find(user_id, &self.users))
    }

    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>> {
        Ok(find_by(&self.users, |u| user_ids.contains(&u.id)))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let mut users = find_by(&self.users, |u| u.email.as_deref() == Some(email));
        if users.is_empty() {
            return Ok(None);
        }
        Ok(Some(users.remove(0)))
    }
}
