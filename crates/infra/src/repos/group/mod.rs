mod inmemory;
mod postgres;

pub use inmemory::InMemoryGroupRepo;
pub use postgres::PostgresGroupRepo;
use remindd_domain::{Group, ID};

/// Groups scope which reminders a user may see through the read API.
/// The dispatch engine never consults them, but the storage collaborator
/// exposes them so scenarios can be set up end to end.
#[async_trait::async_trait]
pub trait IGroupRepo: Send + Sync {
    /// Inserts the group and returns it with its assigned id
    async fn insert(&self, group: &Group) -> anyhow::Result<Group>;
    async fn add_member(&self, group_id: ID, user_id: ID) -> anyhow::Result<()>;
    async fn members(&self, group_id: ID) -> anyhow::Result<Vec<ID>>;
}
