use crate::candidate_buffer::CandidateBuffer;
use crate::session::session_key::SessionKey;
use std::fmt;
use tandem_core::{PeerId, RoomId, SessionDescription};

/// Identifies one session instance (one connection object).
pub type Epoch = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationRole {
    Offering,
    Answering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegotiationState {
    #[default]
    Idle,
    MediaReady,
    AwaitingRoom,
    Negotiating(NegotiationRole),
    Connected,
    Reconnecting,
    Failed,
    Closed,
}

impl NegotiationState {
    pub fn is_negotiating(&self) -> bool {
        matches!(self, NegotiationState::Negotiating(_))
    }

    /// Instance is past room matching, so a fresh `room-ready` is irrelevant.
    pub fn is_engaged(&self) -> bool {
        matches!(
            self,
            NegotiationState::Negotiating(_) | NegotiationState::Connected
        )
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegotiationState::Idle => write!(f, "idle"),
            NegotiationState::MediaReady => write!(f, "media-ready"),
            NegotiationState::AwaitingRoom => write!(f, "awaiting-room"),
            NegotiationState::Negotiating(NegotiationRole::Offering) => write!(f, "offering"),
            NegotiationState::Negotiating(NegotiationRole::Answering) => write!(f, "answering"),
            NegotiationState::Connected => write!(f, "connected"),
            NegotiationState::Reconnecting => write!(f, "reconnecting"),
            NegotiationState::Failed => write!(f, "failed"),
            NegotiationState::Closed => write!(f, "closed"),
        }
    }
}

/// Role handed out by the relay with `room-ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalRole {
    #[default]
    Undecided,
    Initiator,
    Responder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoteDescriptionState {
    #[default]
    Absent,
    /// Handed to the connection object, not yet confirmed.
    Applying,
    Set,
}

/// An offer that arrived before the instance could answer it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOffer {
    pub description: SessionDescription,
    pub token: PeerId,
}

/// Per-session negotiation state. Owned exclusively by the engine task.
#[derive(Debug)]
pub struct Session {
    pub key: SessionKey,
    pub state: NegotiationState,
    /// Bumped for every new connection object and on teardown.
    pub epoch: Epoch,
    /// Bumped when subscriptions are re-registered (reconnect, teardown).
    pub generation: u64,
    /// Consecutive failures; reset when health reports connected.
    pub reconnect_attempt: u32,
    pub role: LocalRole,
    pub room_id: Option<RoomId>,
    pub remote_description: RemoteDescriptionState,
    pub buffer: CandidateBuffer,
    pub pending_offer: Option<PendingOffer>,
}

impl Session {
    pub fn new(key: SessionKey) -> Self {
        Self {
            key,
            state: NegotiationState::Idle,
            epoch: 0,
            generation: 0,
            reconnect_attempt: 0,
            role: LocalRole::Undecided,
            room_id: None,
            remote_description: RemoteDescriptionState::Absent,
            buffer: CandidateBuffer::new(),
            pending_offer: None,
        }
    }

    /// Start a fresh instance: new epoch, empty buffer, no remote description.
    pub fn next_instance(&mut self) -> Epoch {
        self.epoch += 1;
        self.remote_description = RemoteDescriptionState::Absent;
        self.buffer = CandidateBuffer::new();
        self.epoch
    }
}
