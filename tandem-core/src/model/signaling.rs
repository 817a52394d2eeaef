use crate::model::description::{IceCandidate, SessionDescription};
use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Frames exchanged with the relay. Encoded as `{"event": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum SignalMessage {
    /// Client asks to be matched into a room. `room_id` is set when rejoining.
    JoinRoom {
        peer_id: PeerId,
        #[serde(default)]
        room_id: Option<RoomId>,
    },
    RoomJoined {
        room_id: RoomId,
    },
    /// Both seats are taken. `initiator` marks the participant whose join completed the room.
    RoomReady {
        room_id: RoomId,
        initiator: bool,
    },
    Offer {
        description: SessionDescription,
        token: PeerId,
    },
    Answer {
        description: SessionDescription,
    },
    /// `None` is the end-of-candidates marker.
    IceCandidate {
        #[serde(default)]
        candidate: Option<IceCandidate>,
    },
}

impl SignalMessage {
    pub fn kind(&self) -> SignalKind {
        match self {
            SignalMessage::JoinRoom { .. } => SignalKind::JoinRoom,
            SignalMessage::RoomJoined { .. } => SignalKind::RoomJoined,
            SignalMessage::RoomReady { .. } => SignalKind::RoomReady,
            SignalMessage::Offer { .. } => SignalKind::Offer,
            SignalMessage::Answer { .. } => SignalKind::Answer,
            SignalMessage::IceCandidate { .. } => SignalKind::IceCandidate,
        }
    }

    pub fn offer(description: SessionDescription, token: PeerId) -> Self {
        SignalMessage::Offer { description, token }
    }

    pub fn answer(description: SessionDescription) -> Self {
        SignalMessage::Answer { description }
    }

    pub fn candidate(candidate: Option<IceCandidate>) -> Self {
        SignalMessage::IceCandidate { candidate }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Event names, used as subscription keys.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum SignalKind {
    JoinRoom,
    RoomJoined,
    RoomReady,
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    /// Kinds that the relay forwards between the two members of a room.
    pub const PEER_SCOPED: [SignalKind; 3] =
        [SignalKind::Offer, SignalKind::Answer, SignalKind::IceCandidate];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::JoinRoom => "join-room",
            SignalKind::RoomJoined => "room-joined",
            SignalKind::RoomReady => "room-ready",
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "ice-candidate",
        }
    }

    pub fn is_peer_scoped(&self) -> bool {
        Self::PEER_SCOPED.contains(self)
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
