mod envelope;
mod group;
mod reminder;
mod shared;
mod sms;
mod subscription;
mod user;

pub use envelope::{
    NotificationDTO, NotificationEnvelope, NotificationTarget, PushCredentialsDTO,
    PushKeysDTO, PushNotificationDTO, ReminderDTO, SmsNotificationDTO,
};
pub use group::{Group, GroupMembership};
pub use reminder::{Reminder, ReminderStatus};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use sms::sms_body;
pub use subscription::{Subscription, SubscriptionKeys};
pub use user::User;
