use crate::engine::{Input, NegotiationEngine};
use crate::error::{MediaAcquisitionError, NegotiationError, SessionError};
use crate::media::LocalTracks;
use crate::peer::PeerConnection;
use crate::session::{
    Epoch, NegotiationRole, NegotiationState, PendingOffer, RemoteDescriptionState, SessionEvent,
};
use crate::transport::RoomStatus;
use std::sync::Arc;
use tandem_core::{SessionDescription, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Outcome of an operation spawned off the engine loop.
pub(super) enum Completion {
    MediaAcquired(Result<LocalTracks, MediaAcquisitionError>),
    Instantiated(Result<Arc<dyn PeerConnection>, NegotiationError>),
    OfferCreated(Result<SessionDescription, NegotiationError>),
    RemoteApplied {
        result: Result<(), NegotiationError>,
        then: AfterRemote,
    },
    AnswerCreated(Result<SessionDescription, NegotiationError>),
}

/// What follows a successful remote description.
#[derive(Debug, Clone, Copy)]
pub(super) enum AfterRemote {
    /// Remote answer applied: negotiation is done.
    Connect,
    /// Remote offer applied: produce our answer.
    Answer,
}

#[derive(Clone)]
pub(super) struct Completer {
    pub(super) epoch: Epoch,
    pub(super) tx: mpsc::UnboundedSender<Input>,
}

impl Completer {
    /// Hands the completion back when the engine is gone, so the caller can
    /// release whatever it carries.
    pub(super) fn send(&self, op: Completion) -> Option<Completion> {
        match self.tx.send(Input::Completed {
            epoch: self.epoch,
            op,
        }) {
            Ok(()) => None,
            Err(mpsc::error::SendError(Input::Completed { op, .. })) => Some(op),
            Err(_) => None,
        }
    }
}

impl NegotiationEngine {
    pub(super) fn acquire_media(&mut self) {
        let media = self.deps.media.clone();
        let constraints = self.config.constraints;
        let completer = self.completer();

        info!(
            session = %self.session.key,
            "Acquiring local media (audio: {}, video: {})",
            constraints.audio,
            constraints.video
        );

        tokio::spawn(async move {
            let result = media.acquire_local_tracks(&constraints).await;
            if let Some(Completion::MediaAcquired(Ok(tracks))) =
                completer.send(Completion::MediaAcquired(result))
            {
                // Session ended during capture.
                media.release_local_tracks(&tracks);
            }
        });
    }

    pub(super) fn handle_completion(&mut self, epoch: Epoch, op: Completion) {
        if epoch != self.session.epoch {
            self.discard_stale(epoch, op);
            return;
        }

        match op {
            Completion::MediaAcquired(result) => self.on_media_acquired(result),
            Completion::Instantiated(result) => self.on_instantiated(result),
            Completion::OfferCreated(result) => self.on_offer_created(result),
            Completion::RemoteApplied { result, then } => self.on_remote_applied(result, then),
            Completion::AnswerCreated(result) => self.on_answer_created(result),
        }
    }

    fn discard_stale(&self, epoch: Epoch, op: Completion) {
        debug!(
            session = %self.session.key,
            "Dropping completion from epoch {} (current {})",
            epoch,
            self.session.epoch
        );

        match op {
            Completion::Instantiated(Ok(pc)) => self.close_in_background(pc),
            Completion::MediaAcquired(Ok(tracks)) => self.deps.media.release_local_tracks(&tracks),
            _ => {}
        }
    }

    fn on_media_acquired(&mut self, result: Result<LocalTracks, MediaAcquisitionError>) {
        match result {
            Ok(tracks) => {
                info!(session = %self.session.key, "Local media ready: {:?}", tracks.ids());
                self.deps.media.attach_local(&tracks);
                self.local_tracks = Some(tracks);
                self.set_state(NegotiationState::MediaReady);
                self.instantiate();
            }
            Err(e) => {
                error!(session = %self.session.key, "{}", e);
                self.fail(SessionError::MediaAcquisition(e));
            }
        }
    }

    fn on_instantiated(&mut self, result: Result<Arc<dyn PeerConnection>, NegotiationError>) {
        if self.session.state != NegotiationState::MediaReady {
            if let Ok(pc) = result {
                self.close_in_background(pc);
            }
            return;
        }

        match result {
            Ok(pc) => {
                self.install_instance(pc);
                self.set_state(NegotiationState::AwaitingRoom);
                self.try_negotiate();
            }
            Err(e) => {
                warn!(session = %self.session.key, "Failed to create connection object: {}", e);
                self.on_connection_failure("connection object unavailable");
            }
        }
    }

    /// Leave `AwaitingRoom` if there is something to do: answer a stashed
    /// offer, or offer when the relay named us initiator.
    pub(super) fn try_negotiate(&mut self) {
        if self.session.state != NegotiationState::AwaitingRoom {
            return;
        }

        if let Some(offer) = self.session.pending_offer.take() {
            self.start_answering(offer);
            return;
        }

        let status = *self.room_rx.borrow();
        match status {
            RoomStatus::Ready {
                initiator: true, ..
            } => self.start_offering(),
            RoomStatus::Ready { .. } => debug!(session = %self.session.key, "Waiting for offer"),
            _ => debug!(session = %self.session.key, "Waiting for room-ready"),
        }
    }

    fn start_offering(&mut self) {
        let Some(pc) = self.peer.clone() else {
            return;
        };

        self.set_state(NegotiationState::Negotiating(NegotiationRole::Offering));
        self.emit(SessionEvent::RoleAssigned(NegotiationRole::Offering));
        self.arm_negotiation_deadline();

        let completer = self.completer();
        tokio::spawn(async move {
            let result = pc.create_offer().await;
            completer.send(Completion::OfferCreated(result));
        });
    }

    pub(super) fn start_answering(&mut self, offer: PendingOffer) {
        let Some(pc) = self.peer.clone() else {
            self.session.pending_offer = Some(offer);
            return;
        };

        info!(
            session = %self.session.key,
            "Answering offer from {}",
            offer.token.short()
        );
        self.set_state(NegotiationState::Negotiating(NegotiationRole::Answering));
        self.emit(SessionEvent::RoleAssigned(NegotiationRole::Answering));
        self.arm_negotiation_deadline();
        self.apply_remote(pc, offer.description, AfterRemote::Answer);
    }

    pub(super) fn apply_remote(
        &mut self,
        pc: Arc<dyn PeerConnection>,
        description: SessionDescription,
        then: AfterRemote,
    ) {
        self.session.remote_description = RemoteDescriptionState::Applying;

        let completer = self.completer();
        tokio::spawn(async move {
            let result = pc.set_remote_description(description).await;
            completer.send(Completion::RemoteApplied { result, then });
        });
    }

    fn on_offer_created(&mut self, result: Result<SessionDescription, NegotiationError>) {
        if self.session.state != NegotiationState::Negotiating(NegotiationRole::Offering) {
            debug!(session = %self.session.key, "Offer no longer needed");
            return;
        }

        if !self.room_rx.borrow().is_ready() {
            debug!(session = %self.session.key, "Room no longer ready; offer not sent");
            return;
        }

        match result {
            Ok(description) => {
                let token = self.deps.signaling.local_peer();
                self.deps
                    .signaling
                    .send(SignalMessage::offer(description, token));
                info!(session = %self.session.key, "Offer sent");
            }
            Err(e) => warn!(session = %self.session.key, "{}", e),
        }
    }

    fn on_remote_applied(&mut self, result: Result<(), NegotiationError>, then: AfterRemote) {
        if let Err(e) = result {
            warn!(session = %self.session.key, "{}", e);
            self.session.remote_description = RemoteDescriptionState::Absent;
            return;
        }

        self.session.remote_description = RemoteDescriptionState::Set;
        self.flush_candidates();

        match (then, self.session.state) {
            (
                AfterRemote::Connect,
                NegotiationState::Negotiating(NegotiationRole::Offering),
            ) => self.negotiation_complete(),

            (
                AfterRemote::Answer,
                NegotiationState::Negotiating(NegotiationRole::Answering),
            ) => {
                let Some(pc) = self.peer.clone() else {
                    return;
                };
                let completer = self.completer();
                tokio::spawn(async move {
                    let result = pc.create_answer().await;
                    completer.send(Completion::AnswerCreated(result));
                });
            }

            (_, state) => debug!(session = %self.session.key, "Remote description applied in {}", state),
        }
    }

    fn on_answer_created(&mut self, result: Result<SessionDescription, NegotiationError>) {
        if self.session.state != NegotiationState::Negotiating(NegotiationRole::Answering) {
            return;
        }

        match result {
            Ok(description) => {
                self.deps.signaling.send(SignalMessage::answer(description));
                info!(session = %self.session.key, "Answer sent");
                self.negotiation_complete();
            }
            Err(e) => warn!(session = %self.session.key, "{}", e),
        }
    }

    fn negotiation_complete(&mut self) {
        self.negotiation_deadline = None;
        self.set_state(NegotiationState::Connected);
    }

    /// Push everything buffered before the remote description into the applier.
    fn flush_candidates(&mut self) {
        let Some(applier) = &self.applier else {
            return;
        };

        let report = self.session.buffer.flush(|candidate| {
            applier.send(candidate).map_err(|_| {
                NegotiationError::CandidateApply("candidate applier stopped".to_owned())
            })
        });

        if report.applied + report.failed > 0 {
            debug!(
                session = %self.session.key,
                "Flushed {} buffered candidate(s), {} failed",
                report.applied,
                report.failed
            );
        }
    }
}
