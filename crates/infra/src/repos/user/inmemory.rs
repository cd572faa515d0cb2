use super::IUserRepo;
use crate::repos::shared::inmemory_repo::*;
use remindd_domain::{Entity, User, ID};
use std::sync::atomic::AtomicI64;
use std::sync::Mutex;

pub struct InMemoryUserRepo {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(vec![]),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for InMemoryUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<User> {
        let mut user = user.clone();
        user.id = next_id(&self.next_id);
        insert(&user, &self.users);
        Ok(user)
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        let mut users = self.users.lock().unwrap();
        for stored in users.iter_mut() {
            if stored.id() == user.id {
                *stored = user.clone();
            }
        }
        Ok(())
    }

    async fn find(&self, user_id: ID) -> anyhow::Result<Option<User>> {
        Ok(find(user_id, &self.users))
    }
}
