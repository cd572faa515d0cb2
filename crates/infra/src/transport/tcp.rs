use super::IMessageTransport;
use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::info;

/// Connects to the queue consumer socket as a sender and pushes one
/// newline-delimited JSON document per message.
///
/// The connection is established lazily and dropped on write failure, so the
/// next send attempts a fresh connect. Whether a dropped message is retried
/// is up to the caller; the engine treats send failures as publish faults.
pub struct TcpPushTransport {
    address: String,
    stream: Mutex<Option<TcpStream>>,
}

impl TcpPushTransport {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            stream: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl IMessageTransport for TcpPushTransport {
    async fn send(&self, message: &[u8]) -> anyhow::Result<()> {
        let mut guard = self.stream.lock().await;

        if guard.is_none() {
            let stream = TcpStream::connect(&self.address)
                .await
                .with_context(|| format!("Unable to reach message queue at {}", self.address))?;
            info!("Connected to message queue at {}", self.address);
            *guard = Some(stream);
        }

        let stream = guard.as_mut().unwrap();
        let write = async {
            stream.write_all(message).await?;
            stream.write_all(b"\n").await?;
            stream.flush().await
        };

        if let Err(e) = write.await {
            // Force a reconnect on the next send
            *guard = None;
            return Err(e).context("Writing message to queue failed");
        }
        Ok(())
    }
}
