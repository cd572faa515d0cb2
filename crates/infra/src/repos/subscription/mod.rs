mod inmemory;
mod postgres;

pub use inmemory::InMemorySubscriptionRepo;
pub use postgres::PostgresSubscriptionRepo;
use remindd_domain::{Subscription, ID};

/// Browser push subscriptions, created and deleted by the user-management
/// subsystem. The dispatch engine looks them up per recipient.
#[async_trait::async_trait]
pub trait ISubscriptionRepo: Send + Sync {
    /// Inserts the subscription and returns it with its assigned id
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<Subscription>;
    /// An empty `Ok` means the user has no subscriptions; a storage failure
    /// is an error, never an empty result
    async fn find_by_user(&self, user_id: ID) -> anyhow::Result<Vec<Subscription>>;
    async fn delete(&self, subscription_id: ID) -> anyhow::Result<Option<Subscription>>;
}
