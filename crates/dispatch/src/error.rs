use remindd_domain::{ReminderStatus, ID};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    /// Whole-tick failure. Nothing was claimed; the next tick retries.
    #[error("Storage is unavailable: {0}")]
    StorageUnavailable(String),
    /// Per-reminder failure while resolving notification targets. The
    /// reminder stays claimed and re-surfaces once the claim expires.
    #[error("Failed to render notifications for reminder {reminder_id}: {reason}")]
    RenderFailure { reminder_id: ID, reason: String },
    /// Per-reminder failure while emitting the envelope. The recorded `sent`
    /// status is not rolled back; delivery confirmation is not part of the
    /// engine's contract.
    #[error("Failed to publish envelope for reminder {reminder_id}: {reason}")]
    PublishError { reminder_id: ID, reason: String },
    /// A reminder reached two different terminal statuses. Claim exclusivity
    /// rules this out, so hitting it means the engine is broken and the
    /// process should go down rather than keep dispatching.
    #[error(
        "Reminder {reminder_id} already recorded as {current:?} while recording {attempted:?}"
    )]
    InvariantViolation {
        reminder_id: ID,
        current: ReminderStatus,
        attempted: ReminderStatus,
    },
}
