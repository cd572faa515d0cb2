use crate::reminder::{Reminder, ReminderStatus};
use crate::shared::entity::ID;
use crate::subscription::{Subscription, SubscriptionKeys};
use serde::{Deserialize, Serialize};

/// A deliverable notification resolved for one (recipient, channel) pair
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationTarget {
    Push(Subscription),
    Sms {
        body: String,
        /// The recipient's phone number
        target: String,
    },
}

/// The single message published on the queue for a dispatched reminder.
///
/// The `reminder` field is the snapshot taken when the reminder was claimed,
/// so its `status` reads `waiting` even though the stored reminder is marked
/// `sent` by the time the message reaches a consumer. Downstream consumers
/// depend on this shape, including that quirk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    pub reminder: ReminderDTO,
    pub notifications: Vec<NotificationDTO>,
}

impl NotificationEnvelope {
    pub fn new(reminder: &Reminder, targets: Vec<NotificationTarget>) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
            notifications: targets.into_iter().map(NotificationDTO::new).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderDTO {
    pub id: ID,
    pub action: String,
    pub due: i64,
    pub status: ReminderStatus,
}

impl ReminderDTO {
    pub fn new(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id,
            action: reminder.action.clone(),
            due: reminder.due,
            status: reminder.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationDTO {
    Push { subscription: PushNotificationDTO },
    Sms { sms: SmsNotificationDTO },
}

impl NotificationDTO {
    pub fn new(target: NotificationTarget) -> Self {
        match target {
            NotificationTarget::Push(subscription) => Self::Push {
                subscription: PushNotificationDTO::new(subscription),
            },
            NotificationTarget::Sms { body, target } => Self::Sms {
                sms: SmsNotificationDTO { body, target },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsNotificationDTO {
    pub body: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushNotificationDTO {
    pub id: ID,
    pub user_id: ID,
    pub title: String,
    /// The credentials a push service needs to reach this browser
    pub subscription: PushCredentialsDTO,
}

impl PushNotificationDTO {
    pub fn new(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            user_id: subscription.user_id,
            title: subscription.title,
            subscription: PushCredentialsDTO {
                endpoint: subscription.endpoint,
                keys: PushKeysDTO {
                    p256dh: subscription.keys.p256dh,
                    auth: subscription.keys.auth,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushCredentialsDTO {
    pub endpoint: String,
    pub keys: PushKeysDTO,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushKeysDTO {
    pub p256dh: String,
    pub auth: String,
}
