use crate::shared::entity::{Entity, ID};
use chrono_tz::{Tz, UTC};

/// A `User` can receive reminder notifications through the channels it has
/// registered: browser push (one per `Subscription`) and SMS (if a phone
/// number is set).
#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub name: String,
    /// E.164-like digits. When set, the user receives reminders by SMS.
    pub phone_number: Option<String>,
    /// Timezone used when rendering timestamps in SMS bodies
    pub timezone: Tz,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ID::new(0),
            name: name.into(),
            phone_number: None,
            timezone: UTC,
        }
    }
}

impl Entity for User {
    fn id(&self) -> ID {
        self.id
    }
}
