use remindd_domain::{Subscription, SubscriptionKeys, User, ID};
use remindd_infra::{ChannelTransport, Context};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// In-memory context wired to an observable queue receiver
pub fn spawn_engine_context() -> (Context, UnboundedReceiver<Vec<u8>>) {
    let (queue, receiver) = ChannelTransport::pair();
    let ctx = Context::create_inmemory(Arc::new(queue));
    (ctx, receiver)
}

pub async fn insert_user_with_subscription(
    ctx: &Context,
    name: &str,
) -> (User, Subscription) {
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

/// Receives one published envelope, failing the test if none shows up in time
pub async fn next_envelope(receiver: &mut UnboundedReceiver<Vec<u8>>) -> serde_json::Value {
    let message = tokio::time::timeout(Duration::from_secs(2), receiver.recv())
        .await
        .expect("Expected an envelope on the queue")
        .expect("Queue sender is gone");
    serde_json::from_slice(&message).expect("Envelope should be valid JSON")
}
