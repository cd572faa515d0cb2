use crate::error::DispatchError;
use remindd_domain::{ReminderStatus, ID};
use remindd_infra::{Context, StatusTransition};
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Records the terminal outcome of a dispatched reminder.
///
/// Idempotent for the same outcome. Two different terminal outcomes for the
/// same reminder contradict claim exclusivity and surface as an
/// `InvariantViolation`.
pub async fn record_outcome(
    ctx: &Context,
    reminder_id: ID,
    outcome: ReminderStatus,
) -> Result<(), DispatchError> {
    let storage_timeout = Duration::from_millis(ctx.config.storage_timeout_millis);

    let transition = timeout(
        storage_timeout,
        ctx.repos.reminders.record_status(reminder_id, outcome),
    )
    .await
    .map_err(|_| DispatchError::StorageUnavailable("Recording outcome timed out".into()))?
    .map_err(|e| DispatchError::StorageUnavailable(e.to_string()))?;

    match transition {
        StatusTransition::Applied => Ok(()),
        StatusTransition::AlreadyApplied => {
            warn!(
                "Reminder {} was already recorded as {:?}",
                reminder_id, outcome
            );
            Ok(())
        }
        StatusTransition::Conflict(current) => Err(DispatchError::InvariantViolation {
            reminder_id,
            current,
            attempted: outcome,
        }),
    }
}
