use crate::signaling::ConnectionId;
use async_trait::async_trait;
use tandem_core::SignalMessage;

/// Outbound side of the relay: how the coordinator reaches a connected client.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver `msg` to `conn`. Delivery to a closed connection is dropped.
    async fn send(&self, conn: ConnectionId, msg: SignalMessage);
}
