use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tandem_core::SignalMessage;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Bare WebSocket client speaking the signaling wire format.
pub struct WsTestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsTestClient {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let (stream, _) = connect_async(format!("ws://{}/ws", addr))
            .await
            .context("Failed to connect to relay")?;
        Ok(Self { stream })
    }

    pub async fn send(&mut self, msg: &SignalMessage) -> Result<()> {
        let json = msg.encode()?;
        self.stream
            .send(Message::Text(json.into()))
            .await
            .context("Failed to send frame")?;
        Ok(())
    }

    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .context("Failed to send frame")?;
        Ok(())
    }

    /// Next decoded signaling frame.
    pub async fn recv(&mut self, timeout_ms: u64) -> Result<SignalMessage> {
        loop {
            let next = tokio::time::timeout(Duration::from_millis(timeout_ms), self.stream.next())
                .await
                .context("Timeout waiting for frame")?;

            match next {
                Some(Ok(Message::Text(text))) => return Ok(SignalMessage::decode(text.as_str())?),
                Some(Ok(_)) => continue,
                Some(Err(e)) => anyhow::bail!("WebSocket error: {}", e),
                None => anyhow::bail!("WebSocket closed"),
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await.context("Failed to close")?;
        Ok(())
    }
}

/// Start a relay on an ephemeral port.
pub async fn spawn_relay() -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = tandem_relay::serve(listener).await;
    });
    Ok(addr)
}
