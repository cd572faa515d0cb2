mod inmemory;
mod postgres;

pub use inmemory::InMemoryUserRepo;
pub use postgres::PostgresUserRepo;
use remindd_domain::{User, ID};

/// Users are owned by the user-management subsystem. The dispatch engine
/// only reads them to resolve notification channels.
#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    /// Inserts the user and returns it with its assigned id
    async fn insert(&self, user: &User) -> anyhow::Result<User>;
    async fn save(&self, user: &User) -> anyhow::Result<()>;
    /// `Ok(None)` means the user row does not exist; a storage failure is an
    /// error, never an empty result
    async fn find(&self, user_id: ID) -> anyhow::Result<Option<User>>;
}
