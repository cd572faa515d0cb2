use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A `Reminder` is a scheduled action that should be dispatched to every
/// registered notification channel of its recipients once `due` has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// Free text describing what the recipients are reminded about
    pub action: String,
    /// The timestamp in millis (UTC) at which the recipients should be notified
    pub due: i64,
    pub status: ReminderStatus,
    /// The `User`s that should be notified. Fixed at creation.
    pub recipients: Vec<ID>,
    /// Timestamp in millis at which a dispatch cycle claimed this `Reminder`.
    /// A claimed reminder that never reached a terminal status becomes
    /// reclaimable again once the claim has expired.
    pub claimed_at: Option<i64>,
}

impl Reminder {
    pub fn new(action: impl Into<String>, due: i64, recipients: Vec<ID>) -> Self {
        Self {
            id: ID::new(0),
            action: action.into(),
            due,
            status: ReminderStatus::Waiting,
            recipients,
            claimed_at: None,
        }
    }
}

impl Entity for Reminder {
    fn id(&self) -> ID {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReminderStatus {
    /// Not yet dispatched
    Waiting,
    /// Dispatched with at least one notification target
    Sent,
    /// Dispatched, but no recipient had a subscription or a phone number
    ErrorNoSubscription,
}

impl ReminderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Waiting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Sent => "sent",
            Self::ErrorNoSubscription => "error-no-subscription",
        }
    }
}

#[derive(Error, Debug)]
pub enum InvalidStatusError {
    #[error("Reminder status: {0} is not recognized")]
    Unrecognized(String),
}

impl FromStr for ReminderStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "sent" => Ok(Self::Sent),
            "error-no-subscription" => Ok(Self::ErrorNoSubscription),
            _ => Err(InvalidStatusError::Unrecognized(s.to_string())),
        }
    }
}
