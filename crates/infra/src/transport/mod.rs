mod inmemory;
mod tcp;

pub use inmemory::ChannelTransport;
pub use tcp::TcpPushTransport;

/// Push-style connection to the message queue. The engine is the sender,
/// downstream consumers receive; there is no acknowledgement channel back.
/// One call to `send` is one message boundary.
#[async_trait::async_trait]
pub trait IMessageTransport: Send + Sync {
    async fn send(&self, message: &[u8]) -> anyhow::Result<()>;
}
