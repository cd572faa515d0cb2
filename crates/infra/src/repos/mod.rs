mod group;
mod reminder;
mod shared;
mod subscription;
mod user;

pub use group::{IGroupRepo, InMemoryGroupRepo};
use group::PostgresGroupRepo;
pub use reminder::{IReminderRepo, InMemoryReminderRepo, StatusTransition};
use reminder::PostgresReminderRepo;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use subscription::{ISubscriptionRepo, InMemorySubscriptionRepo};
use subscription::PostgresSubscriptionRepo;
use tracing::info;
pub use user::{IUserRepo, InMemoryUserRepo};
use user::PostgresUserRepo;

#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn IUserRepo>,
    pub groups: Arc<dyn IGroupRepo>,
    pub subscriptions: Arc<dyn ISubscriptionRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            groups: Arc::new(PostgresGroupRepo::new(pool.clone())),
            subscriptions: Arc::new(PostgresSubscriptionRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepo::new()),
            groups: Arc::new(InMemoryGroupRepo::new()),
            subscriptions: Arc::new(InMemorySubscriptionRepo::new()),
            reminders: Arc::new(InMemoryReminderRepo::new()),
        }
    }
}
