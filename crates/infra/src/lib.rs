mod config;
mod repos;
mod system;
mod transport;

pub use config::Config;
pub use repos::{
    IGroupRepo, IReminderRepo, ISubscriptionRepo, IUserRepo, InMemoryGroupRepo,
    InMemoryReminderRepo, InMemorySubscriptionRepo, InMemoryUserRepo, Repos, StatusTransition,
};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
pub use transport::{ChannelTransport, IMessageTransport, TcpPushTransport};

/// Everything the dispatch engine needs to talk to the outside world:
/// storage repositories, the message queue connection, configuration and a
/// clock. Explicitly constructed and passed by reference, never a process
/// global.
#[derive(Clone)]
pub struct Context {
    pub repos: Repos,
    pub queue: Arc<dyn IMessageTransport>,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl Context {
    /// In-memory storage and the given queue transport. Used by tests and
    /// when no `DATABASE_URL` is configured.
    pub fn create_inmemory(queue: Arc<dyn IMessageTransport>) -> Self {
        Self {
            repos: Repos::create_inmemory(),
            queue,
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }

    async fn create_postgres(
        connection_string: &str,
        queue: Arc<dyn IMessageTransport>,
    ) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(connection_string).await?;
        Ok(Self {
            repos,
            queue,
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        })
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> Context {
    let config = Config::new();
    let queue: Arc<dyn IMessageTransport> =
        Arc::new(TcpPushTransport::new(&config.queue_address));

    match std::env::var("DATABASE_URL") {
        Ok(connection_string) => Context::create_postgres(&connection_string, queue)
            .await
            .expect("Postgres credentials must be set and valid"),
        Err(_) => {
            tracing::info!("DATABASE_URL not set, falling back to in-memory storage");
            Context::create_inmemory(queue)
        }
    }
}

pub async fn run_migration(connection_string: &str) -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(connection_string)
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
