mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use remindd_domain::{Reminder, ReminderStatus, ID};

/// Outcome of a terminal status transition
#[derive(Debug, Clone, PartialEq)]
pub enum StatusTransition {
    /// The reminder moved from `waiting` to the requested terminal status
    Applied,
    /// The reminder already carried the requested terminal status
    AlreadyApplied,
    /// The reminder already carries a different terminal status. Given claim
    /// exclusivity this must never happen; callers treat it as fatal.
    Conflict(ReminderStatus),
}

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Inserts the reminder and returns it with its assigned id
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<Reminder>;

    async fn find(&self, reminder_id: ID) -> anyhow::Result<Option<Reminder>>;

    /// Atomically claims every reminder that is `waiting`, due at `now` and
    /// not already claimed. Selection and claim stamping happen as one
    /// storage operation, so two overlapping dispatch cycles (or two engine
    /// processes) can never claim the same reminder.
    ///
    /// A claim whose terminal status was never recorded expires after
    /// `claim_ttl` millis and the reminder is handed out again.
    async fn claim_due(&self, now: i64, claim_ttl: i64) -> anyhow::Result<Vec<Reminder>>;

    /// Compare-and-set transition from `waiting` to a terminal status.
    /// Recording the same terminal status twice reports `AlreadyApplied`.
    async fn record_status(
        &self,
        reminder_id: ID,
        status: ReminderStatus,
    ) -> anyhow::Result<StatusTransition>;
}
