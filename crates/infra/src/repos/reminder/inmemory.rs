use super::{IReminderRepo, StatusTransition};
use crate::repos::shared::inmemory_repo::*;
use anyhow::anyhow;
use remindd_domain::{Reminder, ReminderStatus, ID};
use std::sync::atomic::AtomicI64;
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
    next_id: AtomicI64,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(vec![]),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<Reminder> {
        let mut reminder = reminder.clone();
        reminder.id = next_id(&self.next_id);
        insert(&reminder, &self.reminders);
        Ok(reminder)
    }

    async fn find(&self, reminder_id: ID) -> anyhow::Result<Option<Reminder>> {
        Ok(find(reminder_id, &self.reminders))
    }

    async fn claim_due(&self, now: i64, claim_ttl: i64) -> anyhow::Result<Vec<Reminder>> {
        // Selection and stamping happen under one lock, which is what the
        // single UPDATE .. RETURNING gives the postgres repo.
        let mut reminders = self.reminders.lock().unwrap();
        let mut claimed = Vec::new();
        for reminder in reminders.iter_mut() {
            let claim_expired = match reminder.claimed_at {
                Some(claimed_at) => claimed_at <= now - claim_ttl,
                None => true,
            };
            if reminder.status == ReminderStatus::Waiting && reminder.due <= now && claim_expired {
                reminder.claimed_at = Some(now);
                claimed.push(reminder.clone());
            }
        }
        Ok(claimed)
    }

    async fn record_status(
        &self,
        reminder_id: ID,
        status: ReminderStatus,
    ) -> anyhow::Result<StatusTransition> {
        if !status.is_terminal() {
            return Err(anyhow!("Cannot record non-terminal status: {:?}", status));
        }

        let mut reminders = self.reminders.lock().unwrap();
        let reminder = reminders
            .iter_mut()
            .find(|r| r.id == reminder_id)
            .ok_or_else(|| anyhow!("Reminder with id: {} was not found", reminder_id))?;

        match reminder.status {
            ReminderStatus::Waiting => {
                reminder.status = status;
                reminder.claimed_at = None;
                Ok(StatusTransition::Applied)
            }
            current if current == status => Ok(StatusTransition::AlreadyApplied),
            current => Ok(StatusTransition::Conflict(current)),
        }
    }
}
