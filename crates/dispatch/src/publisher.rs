use crate::error::DispatchError;
use remindd_domain::NotificationEnvelope;
use remindd_infra::Context;
use std::time::Duration;
use tokio::time::timeout;

/// Serializes the envelope and pushes it onto the message queue, one message
/// per reminder. The engine attempts this exactly once per newly recorded
/// `sent` reminder; a transport failure is reported but never triggers a
/// second attempt.
pub async fn publish_envelope(
    ctx: &Context,
    envelope: &NotificationEnvelope,
) -> Result<(), DispatchError> {
    let reminder_id = envelope.reminder.id;
    let payload = serde_json::to_vec(envelope).map_err(|e| DispatchError::PublishError {
        reminder_id,
        reason: e.to_string(),
    })?;

    let transport_timeout = Duration::from_millis(ctx.config.transport_timeout_millis);
    timeout(transport_timeout, ctx.queue.send(&payload))
        .await
        .map_err(|_| DispatchError::PublishError {
            reminder_id,
            reason: "Queue send timed out".into(),
        })?
        .map_err(|e| DispatchError::PublishError {
            reminder_id,
            reason: e.to_string(),
        })
}
