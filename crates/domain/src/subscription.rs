use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A registered browser push target for a `User`. Created and deleted by the
/// user-management subsystem; the dispatch engine only reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: ID,
    pub user_id: ID,
    /// Free text set by the user when registering, e.g. the browser name
    pub title: String,
    /// Opaque push-service URL
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    /// Base64 encoded client public key
    pub p256dh: String,
    /// Base64 encoded shared auth secret
    pub auth: String,
}

impl Entity for Subscription {
    fn id(&self) -> ID {
        self.id
    }
}
