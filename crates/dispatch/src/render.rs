use crate::error::DispatchError;
use remindd_domain::{sms_body, NotificationTarget, Reminder, Subscription, User};
use remindd_infra::Context;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Maps one recipient of a reminder to its deliverable notification targets.
///
/// Every registered subscription yields a push target. A registered phone
/// number yields exactly one SMS target with a body rendered in the
/// recipient's timezone. A recipient with neither channel contributes
/// nothing. Deterministic given its inputs.
pub fn render_targets(
    reminder: &Reminder,
    recipient: &User,
    subscriptions: &[Subscription],
    sender_name: &str,
) -> Vec<NotificationTarget> {
    let mut targets: Vec<NotificationTarget> = subscriptions
        .iter()
        .cloned()
        .map(NotificationTarget::Push)
        .collect();

    if let Some(phone_number) = &recipient.phone_number {
        targets.push(NotificationTarget::Sms {
            body: sms_body(
                sender_name,
                &reminder.action,
                reminder.due,
                recipient.timezone,
            ),
            target: phone_number.clone(),
        });
    }

    targets
}

/// Looks up channels for every recipient of the reminder and renders the
/// flat target list. A recipient id that no longer resolves to a user
/// contributes zero targets, like a user without channels. A lookup that
/// fails or times out is a `RenderFailure`, never an empty channel list.
pub async fn resolve_reminder_targets(
    reminder: &Reminder,
    ctx: &Context,
) -> Result<Vec<NotificationTarget>, DispatchError> {
    let lookup_timeout = Duration::from_millis(ctx.config.storage_timeout_millis);
    let mut targets = Vec::new();

    for recipient_id in &reminder.recipients {
        let recipient = timeout(lookup_timeout, ctx.repos.users.find(*recipient_id))
            .await
            .map_err(|_| DispatchError::RenderFailure {
                reminder_id: reminder.id,
                reason: format!("Timed out looking up recipient {}", recipient_id),
            })?
            .map_err(|e| DispatchError::RenderFailure {
                reminder_id: reminder.id,
                reason: format!("Looking up recipient {} failed: {}", recipient_id, e),
            })?;

        let recipient = match recipient {
            Some(user) => user,
            None => {
                warn!(
                    "Reminder {} references recipient {} which does not exist",
                    reminder.id, recipient_id
                );
                continue;
            }
        };

        let subscriptions = timeout(
            lookup_timeout,
            ctx.repos.subscriptions.find_by_user(*recipient_id),
        )
        .await
        .map_err(|_| DispatchError::RenderFailure {
            reminder_id: reminder.id,
            reason: format!("Timed out looking up subscriptions for {}", recipient_id),
        })?
        .map_err(|e| DispatchError::RenderFailure {
            reminder_id: reminder.id,
            reason: format!(
                "Looking up subscriptions for {} failed: {}",
                recipient_id, e
            ),
        })?;

        targets.extend(render_targets(
            reminder,
            &recipient,
            &subscriptions,
            &ctx.config.sms_sender_name,
        ));
    }

    Ok(targets)
}
