use crate::room::room_seats::{Member, RoomSeats};
use crate::signaling::ConnectionId;
use std::collections::HashMap;
use tandem_core::{PeerId, RoomId};
use tracing::info;

/// Result of seating a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub room_id: RoomId,
    /// Both members in join order, present when this join filled the room.
    pub ready: Option<[Member; 2]>,
}

/// Seat bookkeeping for all rooms. Owned by the coordinator task, never shared.
#[derive(Default)]
pub struct RoomManager {
    rooms: HashMap<RoomId, RoomSeats>,
    /// Room ids in creation order; "next available" picks the oldest open room.
    order: Vec<RoomId>,
    seats: HashMap<ConnectionId, RoomId>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_of(&self, conn: ConnectionId) -> Option<RoomId> {
        self.seats.get(&conn).copied()
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&RoomSeats> {
        self.rooms.get(room_id)
    }

    /// Seat `conn`. A `preferred` room is honored when it has a free seat, and
    /// recreated under the same id when it no longer exists (relay restart).
    /// Otherwise the oldest open room is used, or a new one is created.
    pub fn join(
        &mut self,
        conn: ConnectionId,
        peer_id: PeerId,
        preferred: Option<RoomId>,
    ) -> JoinOutcome {
        if self.seats.contains_key(&conn) {
            self.leave(conn);
        }

        let target = match preferred {
            Some(id) => match self.rooms.get(&id) {
                Some(room) if !room.is_full() => id,
                Some(_) => self.next_available(),
                None => self.create(id),
            },
            None => self.next_available(),
        };

        let member = Member { conn, peer_id };
        let room = self
            .rooms
            .entry(target)
            .or_insert_with(|| RoomSeats::new(target));
        room.seat(member);
        self.seats.insert(conn, target);

        let ready = match room.members() {
            [first, second] => Some([*first, *second]),
            _ => None,
        };

        JoinOutcome {
            room_id: target,
            ready,
        }
    }

    /// Remove `conn` from its room. Empty rooms are dropped.
    pub fn leave(&mut self, conn: ConnectionId) -> Option<RoomId> {
        let room_id = self.seats.remove(&conn)?;

        let now_empty = match self.rooms.get_mut(&room_id) {
            Some(room) => {
                room.vacate(conn);
                room.is_empty()
            }
            None => false,
        };

        if now_empty {
            self.rooms.remove(&room_id);
            self.order.retain(|id| id != &room_id);
            info!("Room {} closed", room_id);
        }

        Some(room_id)
    }

    /// The other member of `conn`'s room, only once the room is full.
    pub fn peer_of(&self, conn: ConnectionId) -> Option<Member> {
        let room_id = self.seats.get(&conn)?;
        self.rooms.get(room_id)?.other(conn)
    }

    fn next_available(&mut self) -> RoomId {
        let open = self
            .order
            .iter()
            .find(|id| self.rooms.get(id).is_some_and(|room| !room.is_full()))
            .copied();

        match open {
            Some(id) => id,
            None => self.create(RoomId::new()),
        }
    }

    fn create(&mut self, id: RoomId) -> RoomId {
        info!("Creating new room: {}", id);
        self.rooms.insert(id, RoomSeats::new(id));
        self.order.push(id);
        id
    }
}
