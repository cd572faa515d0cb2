use super::{IReminderRepo, StatusTransition};
use anyhow::anyhow;
use remindd_domain::{Reminder, ReminderStatus, ID};
use sqlx::{FromRow, PgPool};

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    id: i64,
    action: String,
    due: i64,
    status: String,
    recipients: Vec<i64>,
    claimed_at: Option<i64>,
}

impl ReminderRaw {
    fn into_domain(self) -> anyhow::Result<Reminder> {
        Ok(Reminder {
            id: ID::new(self.id),
            action: self.action,
            due: self.due,
            status: self
                .status
                .parse()
                .map_err(|e| anyhow!("Corrupt reminder status in storage: {}", e))?,
            recipients: self.recipients.into_iter().map(ID::new).collect(),
            claimed_at: self.claimed_at,
        })
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<Reminder> {
        let recipients: Vec<i64> = reminder.recipients.iter().map(|id| id.inner()).collect();
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            INSERT INTO reminders (action, due, status, recipients)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&reminder.action)
        .bind(reminder.due)
        .bind(reminder.status.as_str())
        .bind(&recipients)
        .fetch_one(&self.pool)
        .await?;

        raw.into_domain()
    }

    async fn find(&self, reminder_id: ID) -> anyhow::Result<Option<Reminder>> {
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE id = $1
            "#,
        )
        .bind(reminder_id.inner())
        .fetch_optional(&self.pool)
        .await?;

        raw.map(|raw| raw.into_domain()).transpose()
    }

    async fn claim_due(&self, now: i64, claim_ttl: i64) -> anyhow::Result<Vec<Reminder>> {
        // One statement selects and stamps, so concurrent engine processes
        // contend on row locks instead of double-claiming.
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            UPDATE reminders
            SET claimed_at = $1
            WHERE status = 'waiting'
              AND due <= $1
              AND (claimed_at IS NULL OR claimed_at <= $1 - $2)
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(claim_ttl)
        .fetch_all(&self.pool)
        .await?;

        raw.into_iter().map(|r| r.into_domain()).collect()
    }

    async fn record_status(
        &self,
        reminder_id: ID,
        status: ReminderStatus,
    ) -> anyhow::Result<StatusTransition> {
        if !status.is_terminal() {
            return Err(anyhow!("Cannot record non-terminal status: {:?}", status));
        }

        let updated = sqlx::query(
            r#"
            UPDATE reminders
            SET status = $2, claimed_at = NULL
            WHERE id = $1 AND status = 'waiting'
            "#,
        )
        .bind(reminder_id.inner())
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 1 {
            return Ok(StatusTransition::Applied);
        }

        let current = self
            .find(reminder_id)
            .await?
            .ok_or_else(|| anyhow!("Reminder with id: {} was not found", reminder_id))?;
        if current.status == status {
            Ok(StatusTransition::AlreadyApplied)
        } else {
            Ok(StatusTransition::Conflict(current.status))
        }
    }
}
