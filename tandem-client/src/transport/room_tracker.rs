use tandem_core::{PeerId, RoomId, SignalMessage};
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomStatus {
    #[default]
    Unjoined,
    Joined(RoomId),
    /// Both seats taken. `initiator` is set for the participant whose join
    /// completed the room.
    Ready { room_id: RoomId, initiator: bool },
}

impl RoomStatus {
    pub fn room_id(&self) -> Option<RoomId> {
        match self {
            RoomStatus::Unjoined => None,
            RoomStatus::Joined(room_id) | RoomStatus::Ready { room_id, .. } => Some(*room_id),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, RoomStatus::Ready { .. })
    }
}

/// Follows `room-joined`/`room-ready` for one signaling link and remembers
/// the last room so a reconnect can ask for it back.
pub struct RoomTracker {
    status: watch::Sender<RoomStatus>,
    last_room: Option<RoomId>,
}

impl Default for RoomTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomTracker {
    pub fn new() -> Self {
        let (status, _) = watch::channel(RoomStatus::Unjoined);
        Self {
            status,
            last_room: None,
        }
    }

    pub fn watch(&self) -> watch::Receiver<RoomStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> RoomStatus {
        *self.status.borrow()
    }

    pub fn last_room(&self) -> Option<RoomId> {
        self.last_room
    }

    /// Returns true when the message was a room event.
    pub fn observe(&mut self, msg: &SignalMessage) -> bool {
        let next = match msg {
            SignalMessage::RoomJoined { room_id } => {
                info!("Joined room {}", room_id);
                RoomStatus::Joined(*room_id)
            }
            SignalMessage::RoomReady { room_id, initiator } => {
                info!("Room {} ready (initiator: {})", room_id, initiator);
                RoomStatus::Ready {
                    room_id: *room_id,
                    initiator: *initiator,
                }
            }
            _ => return false,
        };

        self.last_room = next.room_id();
        self.status.send_replace(next);
        true
    }

    /// Link lost: readiness must be observed again after rejoining.
    pub fn reset(&mut self) {
        self.status.send_replace(RoomStatus::Unjoined);
    }

    pub fn join_request(&self, peer_id: PeerId) -> SignalMessage {
        SignalMessage::JoinRoom {
            peer_id,
            room_id: self.last_room,
        }
    }
}
