use super::ISubscriptionRepo;
use crate::repos::shared::inmemory_repo::*;
use remindd_domain::{Subscription, ID};
use std::sync::atomic::AtomicI64;
use std::sync::Mutex;

pub struct InMemorySubscriptionRepo {
    subscriptions: Mutex<Vec<Subscription>>,
    next_id: AtomicI64,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self {
            subscriptions: Mutex::new(vec![]),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait::async_trait]
impl ISubscriptionRepo for InMemorySubscriptionRepo {
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<Subscription> {
        let mut subscription = subscription.clone();
        subscription.id = next_id(&self.next_id);
        insert(&subscription, &self.subscriptions);
        Ok(subscription)
    }

    async fn find_by_user(&self, user_id: ID) -> anyhow::Result<Vec<Subscription>> {
        Ok(find_by(&self.subscriptions, |s| s.user_id == user_id))
    }

    async fn delete(&self, subscription_id: ID) -> anyhow::Result<Option<Subscription>> {
        Ok(delete(subscription_id, &self.subscriptions))
    }
}
