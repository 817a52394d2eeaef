use crate::engine::NegotiationEngine;
use crate::engine::completion_impl::AfterRemote;
use crate::session::{
    LocalRole, NegotiationRole, NegotiationState, PendingOffer, RemoteDescriptionState,
    SessionEvent,
};
use crate::transport::RoomStatus;
use tandem_core::{IceCandidate, RoomId, SessionDescription, SignalMessage};
use tracing::{debug, info, warn};

impl NegotiationEngine {
    pub(super) fn handle_signal(&mut self, generation: u64, msg: SignalMessage) {
        if generation != self.session.generation {
            debug!(session = %self.session.key, "Dropping stale '{}'", msg.kind());
            return;
        }

        match msg {
            SignalMessage::Offer { description, token } => {
                self.on_remote_offer(PendingOffer { description, token })
            }
            SignalMessage::Answer { description } => self.on_remote_answer(description),
            SignalMessage::IceCandidate { candidate } => self.on_remote_candidate(candidate),
            other => debug!(session = %self.session.key, "Ignoring '{}'", other.kind()),
        }
    }

    fn on_remote_offer(&mut self, offer: PendingOffer) {
        match self.session.state {
            NegotiationState::Idle | NegotiationState::MediaReady | NegotiationState::Reconnecting => {
                debug!(session = %self.session.key, "Offer arrived before the connection object; holding it");
                self.session.pending_offer = Some(offer);
            }

            NegotiationState::AwaitingRoom => self.start_answering(offer),

            NegotiationState::Negotiating(NegotiationRole::Offering) => {
                let local = self.deps.signaling.local_peer();
                if local < offer.token {
                    info!(
                        session = %self.session.key,
                        "Glare with {}: keeping the initiator role",
                        offer.token.short()
                    );
                } else {
                    info!(
                        session = %self.session.key,
                        "Glare with {}: yielding and answering",
                        offer.token.short()
                    );
                    self.restart_instance(offer);
                }
            }

            NegotiationState::Negotiating(NegotiationRole::Answering)
            | NegotiationState::Connected => self.restart_instance(offer),

            NegotiationState::Failed | NegotiationState::Closed => {
                debug!(session = %self.session.key, "Ignoring offer in {}", self.session.state)
            }
        }
    }

    fn on_remote_answer(&mut self, description: SessionDescription) {
        let expecting = self.session.state
            == NegotiationState::Negotiating(NegotiationRole::Offering)
            && self.session.remote_description == RemoteDescriptionState::Absent;

        if !expecting {
            debug!(session = %self.session.key, "Ignoring answer in {}", self.session.state);
            return;
        }

        let Some(pc) = self.peer.clone() else {
            return;
        };
        info!(session = %self.session.key, "Answer received");
        self.apply_remote(pc, description, AfterRemote::Connect);
    }

    fn on_remote_candidate(&mut self, candidate: Option<IceCandidate>) {
        if matches!(
            self.session.state,
            NegotiationState::Failed | NegotiationState::Closed
        ) {
            return;
        }

        let Some(candidate) = candidate else {
            debug!(session = %self.session.key, "Remote finished gathering candidates");
            return;
        };

        match (self.session.remote_description, &self.applier) {
            (RemoteDescriptionState::Set, Some(applier)) => {
                if applier.send(candidate).is_err() {
                    warn!(session = %self.session.key, "Candidate applier stopped; dropping candidate");
                }
            }
            _ => {
                self.session.buffer.append(candidate);
                debug!(
                    session = %self.session.key,
                    "Buffered remote candidate ({} pending)",
                    self.session.buffer.len()
                );
            }
        }
    }

    pub(super) fn handle_room_change(&mut self) {
        let status = *self.room_rx.borrow_and_update();
        // Readiness is only published by `room-ready`, so a change that lands
        // on `Ready` again means the room was lost and filled anew.
        let was_ready = self.session.role != LocalRole::Undecided;

        match status {
            RoomStatus::Unjoined => {
                debug!(session = %self.session.key, "Room membership lost");
                self.session.role = LocalRole::Undecided;
                if was_ready {
                    self.pause_for_room();
                }
            }
            RoomStatus::Joined(room_id) => {
                self.assign_room(room_id);
                self.session.role = LocalRole::Undecided;
                if was_ready {
                    self.pause_for_room();
                }
            }
            RoomStatus::Ready { room_id, initiator } => {
                self.assign_room(room_id);
                self.session.role = if initiator {
                    LocalRole::Initiator
                } else {
                    LocalRole::Responder
                };

                if was_ready && self.session.state.is_negotiating() {
                    self.pause_for_room();
                    return;
                }
                if self.session.state.is_engaged() {
                    debug!(session = %self.session.key, "room-ready while {}; ignored", self.session.state);
                    return;
                }
                self.try_negotiate();
            }
        }
    }

    /// Signaling for the current exchange was lost with the room. Start a
    /// fresh instance that waits for the next `room-ready`. Established
    /// media is left alone, and no reconnect attempt is counted.
    fn pause_for_room(&mut self) {
        if !self.session.state.is_negotiating() {
            return;
        }

        info!(
            session = %self.session.key,
            "Room lost while {}; renegotiating after the next room-ready",
            self.session.state
        );
        if let Some(pc) = self.take_instance() {
            self.close_in_background(pc);
        }
        self.session.next_instance();
        self.session.pending_offer = None;
        self.set_state(NegotiationState::MediaReady);
        self.instantiate();
    }

    fn assign_room(&mut self, room_id: RoomId) {
        if self.session.room_id == Some(room_id) {
            return;
        }
        info!(session = %self.session.key, room = %room_id, "Room assigned");
        self.session.room_id = Some(room_id);
        self.emit(SessionEvent::RoomAssigned(room_id));
    }
}
