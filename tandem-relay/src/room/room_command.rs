use crate::signaling::ConnectionId;
use tandem_core::{PeerId, RoomId, SignalMessage};

/// Commands the WebSocket layer feeds into the room coordinator.
#[derive(Debug)]
pub enum RoomCommand {
    /// `join-room` received. `room_id` is the room the client held before a reconnect.
    Join {
        conn: ConnectionId,
        peer_id: PeerId,
        room_id: Option<RoomId>,
    },

    /// Offer, answer or ICE candidate to hand to the other member of the room.
    Forward {
        conn: ConnectionId,
        msg: SignalMessage,
    },

    /// The socket closed.
    Disconnect { conn: ConnectionId },
}
