use crate::transport::room_tracker::RoomStatus;
use std::sync::Arc;
use tandem_core::{PeerId, SignalKind, SignalMessage};
use tokio::sync::watch;

/// Callback invoked once per matching inbound message.
pub type SignalHandler = Arc<dyn Fn(SignalMessage) + Send + Sync>;

/// Bidirectional message channel to the relay. Sends are fire-and-forget:
/// a message sent while the link is down is dropped, never queued.
pub trait SignalingChannel: Send + Sync {
    /// Identity announced in `join-room`, also used as the glare tie-break token.
    fn local_peer(&self) -> PeerId;

    fn send(&self, msg: SignalMessage);

    fn subscribe(&self, kind: SignalKind, handler: SignalHandler);

    /// Removes every handler registered for `kind`.
    fn unsubscribe(&self, kind: SignalKind);

    fn room(&self) -> watch::Receiver<RoomStatus>;
}
