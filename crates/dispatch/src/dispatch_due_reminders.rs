use crate::error::DispatchError;
use crate::publisher::publish_envelope;
use crate::render::resolve_reminder_targets;
use crate::shared::usecase::UseCase;
use crate::status::record_outcome;
use futures::future::join_all;
use remindd_domain::{NotificationEnvelope, NotificationTarget, Reminder, ReminderStatus, ID};
use remindd_infra::Context;
use std::time::Duration;
use tokio::time::timeout;
use tracing::error;

/// One dispatch cycle: claim the batch of due reminders, render notification
/// targets per reminder, record the outcome and publish one envelope per
/// reminder that resolved to at least one target.
///
/// Duplicate protection lives entirely in the claim: the cycle itself takes
/// no locks and two cycles may overlap in wall-clock terms without a
/// reminder ever being dispatched twice.
#[derive(Debug)]
pub struct DispatchDueRemindersUseCase;

#[derive(Debug, Default)]
pub struct DispatchReport {
    pub claimed: usize,
    /// Recorded `sent` and an envelope publish was attempted
    pub sent: Vec<ID>,
    /// Recorded `error-no-subscription`, nothing published
    pub without_subscription: Vec<ID>,
    /// Publish attempted and failed; status stays `sent`
    pub publish_failures: Vec<ID>,
    /// Render or record fault; left claimed until the claim expires
    pub faulted: Vec<ID>,
}

#[async_trait::async_trait]
impl UseCase for DispatchDueRemindersUseCase {
    type Response = DispatchReport;

    type Error = DispatchError;

    const NAME: &'static str = "DispatchDueReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let storage_timeout = Duration::from_millis(ctx.config.storage_timeout_millis);

        let claimed = timeout(
            storage_timeout,
            ctx.repos
                .reminders
                .claim_due(now, ctx.config.claim_ttl_millis),
        )
        .await
        .map_err(|_| DispatchError::StorageUnavailable("Claiming due reminders timed out".into()))?
        .map_err(|e| DispatchError::StorageUnavailable(e.to_string()))?;

        let mut report = DispatchReport {
            claimed: claimed.len(),
            ..Default::default()
        };
        if claimed.is_empty() {
            return Ok(report);
        }

        // Claimed reminders are independent, so they render concurrently
        let resolutions = join_all(
            claimed
                .iter()
                .map(|reminder| resolve_reminder_targets(reminder, ctx)),
        )
        .await;

        for (reminder, resolution) in claimed.iter().zip(resolutions) {
            match resolution {
                Ok(targets) => {
                    self.complete_reminder(ctx, reminder, targets, &mut report)
                        .await?
                }
                Err(e) => {
                    // Isolated fault: the claim expires and a later cycle retries
                    error!("{}", e);
                    report.faulted.push(reminder.id);
                }
            }
        }

        Ok(report)
    }
}

impl DispatchDueRemindersUseCase {
    /// Records the outcome for one rendered reminder and publishes its
    /// envelope if anything resolved. Only an `InvariantViolation` escapes;
    /// other faults are contained in the report.
    async fn complete_reminder(
        &self,
        ctx: &Context,
        reminder: &Reminder,
        targets: Vec<NotificationTarget>,
        report: &mut DispatchReport,
    ) -> Result<(), DispatchError> {
        let outcome = if targets.is_empty() {
            ReminderStatus::ErrorNoSubscription
        } else {
            ReminderStatus::Sent
        };

        match record_outcome(ctx, reminder.id, outcome).await {
            Ok(()) => {}
            Err(e @ DispatchError::InvariantViolation { .. }) => return Err(e),
            Err(e) => {
                error!("{}", e);
                report.faulted.push(reminder.id);
                return Ok(());
            }
        }

        if outcome == ReminderStatus::ErrorNoSubscription {
            report.without_subscription.push(reminder.id);
            return Ok(());
        }

        // The envelope snapshots the reminder as claimed, before the
        // terminal status committed
        let envelope = NotificationEnvelope::new(reminder, targets);
        report.sent.push(reminder.id);
        if let Err(e) = publish_envelope(ctx, &envelope).await {
            error!("{}", e);
            report.publish_failures.push(reminder.id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use remindd_domain::{Subscription, SubscriptionKeys, User};
    use remindd_infra::{ChannelTransport, ISubscriptionRepo, ISys, InMemorySubscriptionRepo};
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc::UnboundedReceiver;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    // 2021-03-01 16:00 UTC
    const NOW: i64 = 1614614400000;

    /// Delegates to in-memory storage but can fail subscription lookups for
    /// one user, like a connection dropping mid-cycle
    struct FlakySubscriptionRepo {
        inner: InMemorySubscriptionRepo,
        fail_for: Mutex<Option<ID>>,
    }

    impl FlakySubscriptionRepo {
        fn new() -> Self {
            Self {
                inner: InMemorySubscriptionRepo::new(),
                fail_for: Mutex::new(None),
            }
        }

        fn fail_lookups_for(&self, user_id: Option<ID>) {
            *self.fail_for.lock().unwrap() = user_id;
        }
    }

    #[async_trait::async_trait]
    impl ISubscriptionRepo for FlakySubscriptionRepo {
        async fn insert(&self, subscription: &Subscription) -> anyhow::Result<Subscription> {
            self.inner.insert(subscription).await
        }

        async fn find_by_user(&self, user_id: ID) -> anyhow::Result<Vec<Subscription>> {
            if *self.fail_for.lock().unwrap() == Some(user_id) {
                anyhow::bail!("Connection refused");
            }
            self.inner.find_by_user(user_id).await
        }

        async fn delete(&self, subscription_id: ID) -> anyhow::Result<Option<Subscription>> {
            self.inner.delete(subscription_id).await
        }
    }

    fn setup() -> (Context, UnboundedReceiver<Vec<u8>>) {
        let (queue, receiver) = ChannelTransport::pair();
        let mut ctx = Context::create_inmemory(Arc::new(queue));
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        (ctx, receiver)
    }

    async fn insert_user_with_subscription(ctx: &Context, name: &str) -> (User, Subscription) {
        let user = ctx.repos.users.insert(&User::new(name)).await.unwrap();
        let subscription = ctx
            .repos
            .subscriptions
            .insert(&Subscription {
                id: ID::new(0),
                user_id: user.id,
                title: format!("{}'s browser", name),
                endpoint: format!("https://push.example.com/{}", name),
                keys: SubscriptionKeys {
                    p256dh: format!("p256dh-{}", name),
                    auth: format!("auth-{}", name),
                },
            })
            .await
            .unwrap();
        (user, subscription)
    }

    #[tokio::test]
    async fn dispatches_due_reminder_and_records_sent() {
        let (ctx, mut receiver) = setup();
        let (user, subscription) = insert_user_with_subscription(&ctx, "ada").await;
        let reminder = ctx
            .repos
            .reminders
            .insert(&Reminder::new("Standup", NOW - 1000, vec![user.id]))
            .await
            .unwrap();

        let report = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(report.claimed, 1);
        assert_eq!(report.sent, vec![reminder.id]);
        assert!(report.publish_failures.is_empty());

        let stored = ctx.repos.reminders.find(reminder.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);

        let message = receiver.recv().await.unwrap();
        let envelope: serde_json::Value = serde_json::from_slice(&message).unwrap();
        assert_eq!(envelope["reminder"]["id"], reminder.id.inner());
        // Snapshot taken at claim time, before the terminal status committed
        assert_eq!(envelope["reminder"]["status"], "waiting");
        assert_eq!(
            envelope["notifications"][0]["subscription"]["id"],
            subscription.id.inner()
        );
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn reminder_not_yet_due_is_left_alone() {
        let (ctx, mut receiver) = setup();
        let (user, _) = insert_user_with_subscription(&ctx, "ada").await;
        let reminder = ctx
            .repos
            .reminders
            .insert(&Reminder::new("Standup", NOW + 60_000, vec![user.id]))
            .await
            .unwrap();

        let report = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(report.claimed, 0);
        assert!(receiver.try_recv().is_err());

        let stored = ctx.repos.reminders.find(reminder.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Waiting);
    }

    #[tokio::test]
    async fn no_resolvable_targets_records_error_and_publishes_nothing() {
        let (ctx, mut receiver) = setup();
        let user = ctx.repos.users.insert(&User::new("ada")).await.unwrap();
        let reminder = ctx
            .repos
            .reminders
            .insert(&Reminder::new("Standup", NOW - 1000, vec![user.id]))
            .await
            .unwrap();

        let report = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(report.without_subscription, vec![reminder.id]);
        assert!(report.sent.is_empty());
        assert!(receiver.try_recv().is_err());

        let stored = ctx.repos.reminders.find(reminder.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::ErrorNoSubscription);
    }

    #[tokio::test]
    async fn missing_recipient_counts_as_no_target() {
        let (ctx, mut receiver) = setup();
        let reminder = ctx
            .repos
            .reminders
            .insert(&Reminder::new("Standup", NOW - 1000, vec![ID::new(404)]))
            .await
            .unwrap();

        let report = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(report.without_subscription, vec![reminder.id]);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn failed_lookup_is_isolated_and_retried_after_claim_expiry() {
        let (mut ctx, mut receiver) = setup();
        let flaky = Arc::new(FlakySubscriptionRepo::new());
        ctx.repos.subscriptions = flaky.clone();

        let (alice, _) = insert_user_with_subscription(&ctx, "alice").await;
        let (bob, _) = insert_user_with_subscription(&ctx, "bob").await;
        let alices = ctx
            .repos
            .reminders
            .insert(&Reminder::new("Water alice's plants", NOW - 1000, vec![alice.id]))
            .await
            .unwrap();
        let bobs = ctx
            .repos
            .reminders
            .insert(&Reminder::new("Water bob's plants", NOW - 1000, vec![bob.id]))
            .await
            .unwrap();

        flaky.fail_lookups_for(Some(alice.id));
        let report = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(report.claimed, 2);
        assert_eq!(report.faulted, vec![alices.id]);
        assert_eq!(report.sent, vec![bobs.id]);

        // The sibling's envelope went out despite the fault
        let message = receiver.recv().await.unwrap();
        let envelope: serde_json::Value = serde_json::from_slice(&message).unwrap();
        assert_eq!(envelope["reminder"]["id"], bobs.id.inner());
        assert!(receiver.try_recv().is_err());

        // The faulted reminder keeps its claim and visible status
        let stored = ctx.repos.reminders.find(alices.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Waiting);
        assert_eq!(stored.claimed_at, Some(NOW));

        // Claim still held: the next cycle does not hand it out again
        let second = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(second.claimed, 0);

        // Once the claim expires, a healthy cycle dispatches it
        flaky.fail_lookups_for(None);
        ctx.sys = Arc::new(StaticTimeSys(NOW + ctx.config.claim_ttl_millis));
        let third = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(third.sent, vec![alices.id]);

        let message = receiver.recv().await.unwrap();
        let envelope: serde_json::Value = serde_json::from_slice(&message).unwrap();
        assert_eq!(envelope["reminder"]["id"], alices.id.inner());
        let stored = ctx.repos.reminders.find(alices.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);
    }

    #[tokio::test]
    async fn deleted_subscription_degrades_to_remaining_channels() {
        let (ctx, mut receiver) = setup();
        let (mut user, subscription) = insert_user_with_subscription(&ctx, "ada").await;
        user.phone_number = Some("4799999999".into());
        user.timezone = chrono_tz::Etc::GMTPlus7;
        ctx.repos.users.save(&user).await.unwrap();

        let removed = ctx
            .repos
            .subscriptions
            .delete(subscription.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(removed.id, subscription.id);

        let reminder = ctx
            .repos
            .reminders
            .insert(&Reminder::new("Standup", NOW - 1000, vec![user.id]))
            .await
            .unwrap();

        let report = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(report.sent, vec![reminder.id]);

        let message = receiver.recv().await.unwrap();
        let envelope: serde_json::Value = serde_json::from_slice(&message).unwrap();
        let notifications = envelope["notifications"].as_array().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0]["sms"]["target"], "4799999999");
    }

    #[tokio::test]
    async fn one_envelope_even_when_a_reminder_has_many_channels() {
        let (ctx, mut receiver) = setup();
        let (mut user, _) = insert_user_with_subscription(&ctx, "ada").await;
        user.phone_number = Some("4799999999".into());
        user.timezone = chrono_tz::Etc::GMTPlus7;
        ctx.repos.users.save(&user).await.unwrap();

        ctx.repos
            .reminders
            .insert(&Reminder::new("Standup", NOW - 1000, vec![user.id]))
            .await
            .unwrap();

        let report = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(report.sent.len(), 1);

        let message = receiver.recv().await.unwrap();
        let envelope: serde_json::Value = serde_json::from_slice(&message).unwrap();
        let notifications = envelope["notifications"].as_array().unwrap();
        assert_eq!(notifications.len(), 2);
        assert!(notifications[0].get("subscription").is_some());
        assert_eq!(
            notifications[1]["sms"]["body"],
            "Reminder from Remindd:\nStandup at 9:00 AM"
        );
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn back_to_back_cycles_never_publish_twice() {
        let (ctx, mut receiver) = setup();
        let (user, _) = insert_user_with_subscription(&ctx, "ada").await;
        ctx.repos
            .reminders
            .insert(&Reminder::new("Standup", NOW, vec![user.id]))
            .await
            .unwrap();

        let ctx2 = ctx.clone();
        let (first, second) = tokio::join!(
            execute(DispatchDueRemindersUseCase, &ctx),
            execute(DispatchDueRemindersUseCase, &ctx2),
        );
        assert_eq!(first.unwrap().claimed + second.unwrap().claimed, 1);

        assert!(receiver.recv().await.is_some());
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn second_cycle_at_same_instant_claims_nothing() {
        let (ctx, _receiver) = setup();
        let (user, _) = insert_user_with_subscription(&ctx, "ada").await;
        ctx.repos
            .reminders
            .insert(&Reminder::new("Standup", NOW - 1000, vec![user.id]))
            .await
            .unwrap();

        let first = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(first.claimed, 1);
        let second = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(second.claimed, 0);
    }

    #[tokio::test]
    async fn publish_failure_keeps_sent_status() {
        let (ctx, receiver) = setup();
        // No consumer: every send fails
        drop(receiver);

        let (user, _) = insert_user_with_subscription(&ctx, "ada").await;
        let reminder = ctx
            .repos
            .reminders
            .insert(&Reminder::new("Standup", NOW - 1000, vec![user.id]))
            .await
            .unwrap();

        let report = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(report.sent, vec![reminder.id]);
        assert_eq!(report.publish_failures, vec![reminder.id]);

        let stored = ctx.repos.reminders.find(reminder.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);
    }

    #[tokio::test]
    async fn conflicting_outcome_surfaces_as_invariant_violation() {
        let (ctx, _receiver) = setup();
        let reminder = ctx
            .repos
            .reminders
            .insert(&Reminder::new("Standup", NOW - 1000, vec![]))
            .await
            .unwrap();

        record_outcome(&ctx, reminder.id, ReminderStatus::Sent)
            .await
            .unwrap();
        // Same outcome again is a no-op
        record_outcome(&ctx, reminder.id, ReminderStatus::Sent)
            .await
            .unwrap();

        let err = record_outcome(&ctx, reminder.id, ReminderStatus::ErrorNoSubscription)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvariantViolation { .. }));
    }
}
