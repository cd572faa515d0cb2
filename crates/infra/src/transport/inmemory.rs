use super::IMessageTransport;
use tokio::sync::mpsc;

/// Delivers messages to an in-process receiver. Used by tests that want to
/// observe exactly which messages the engine published.
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChannelTransport {
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait::async_trait]
impl IMessageTransport for ChannelTransport {
    async fn send(&self, message: &[u8]) -> anyhow::Result<()> {
        self.sender
            .send(message.to_vec())
            .map_err(|_| anyhow::anyhow!("Message queue receiver is gone"))
    }
}
