use crate::signaling::ConnectionId;
use tandem_core::{PeerId, RoomId};

pub const ROOM_CAPACITY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub conn: ConnectionId,
    pub peer_id: PeerId,
}

/// One two-seat room. Members are kept in join order.
#[derive(Debug)]
pub struct RoomSeats {
    pub id: RoomId,
    members: Vec<Member>,
}

impl RoomSeats {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            members: Vec::with_capacity(ROOM_CAPACITY),
        }
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub(crate) fn seat(&mut self, member: Member) -> bool {
        if self.is_full() {
            return false;
        }
        self.members.push(member);
        true
    }

    pub(crate) fn vacate(&mut self, conn: ConnectionId) {
        self.members.retain(|m| m.conn != conn);
    }

    /// The other member, once the room is full.
    pub fn other(&self, conn: ConnectionId) -> Option<Member> {
        if !self.is_full() {
            return None;
        }
        self.members.iter().copied().find(|m| m.conn != conn)
    }
}
