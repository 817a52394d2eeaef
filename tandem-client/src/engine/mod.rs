//! Per-session negotiation actor. One task owns the `Session`, the current
//! connection object and the local tracks; everything else talks to it
//! through channels tagged with the epoch they belong to.

use crate::config::SessionConfig;
use crate::ice_config::IceServerProvider;
use crate::media::{LocalTracks, MediaTrackAdapter};
use crate::peer::{PeerConnection, PeerConnectionFactory, PeerEvent};
use crate::session::{
    Epoch, NegotiationState, Session, SessionEvent, SessionHandle, SessionKey,
};
use crate::transport::{RoomStatus, SignalingChannel};
use std::sync::Arc;
use tandem_core::IceCandidate;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::info;

mod completion_impl;
mod handle_peer_event_impl;
mod handle_signal_impl;
mod instance_impl;
mod reconnect_impl;
mod teardown_impl;

use completion_impl::{Completer, Completion};

/// Collaborators of one session. The engine owns the offer, answer and
/// candidate subscriptions of its `signaling` channel, so every session
/// needs a channel of its own.
#[derive(Clone)]
pub struct EngineDeps {
    pub signaling: Arc<dyn SignalingChannel>,
    pub media: Arc<dyn MediaTrackAdapter>,
    pub ice: Arc<dyn IceServerProvider>,
    pub peers: Arc<dyn PeerConnectionFactory>,
}

#[derive(Debug)]
pub(crate) enum EngineCommand {
    Teardown,
}

enum Input {
    Signal {
        generation: u64,
        msg: tandem_core::SignalMessage,
    },
    Completed {
        epoch: Epoch,
        op: Completion,
    },
}

pub struct NegotiationEngine {
    session: Session,
    config: SessionConfig,
    deps: EngineDeps,

    peer: Option<Arc<dyn PeerConnection>>,
    /// Feeds the FIFO candidate applier of the current instance.
    applier: Option<mpsc::UnboundedSender<IceCandidate>>,
    local_tracks: Option<LocalTracks>,

    command_rx: mpsc::Receiver<EngineCommand>,
    inbox_tx: mpsc::UnboundedSender<Input>,
    inbox_rx: mpsc::UnboundedReceiver<Input>,
    peer_tx: mpsc::UnboundedSender<(Epoch, PeerEvent)>,
    peer_rx: mpsc::UnboundedReceiver<(Epoch, PeerEvent)>,
    room_rx: watch::Receiver<RoomStatus>,
    room_open: bool,

    state_tx: watch::Sender<NegotiationState>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,

    reconnect_at: Option<Instant>,
    negotiation_deadline: Option<Instant>,
}

impl NegotiationEngine {
    /// Start a session in its own task.
    pub fn spawn(
        key: SessionKey,
        config: SessionConfig,
        deps: EngineDeps,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<SessionEvent>) {
        let (command_tx, command_rx) = mpsc::channel(8);
        let (state_tx, state_rx) = watch::channel(NegotiationState::Idle);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (peer_tx, peer_rx) = mpsc::unbounded_channel();
        let room_rx = deps.signaling.room();

        let engine = Self {
            session: Session::new(key),
            config,
            deps,
            peer: None,
            applier: None,
            local_tracks: None,
            command_rx,
            inbox_tx,
            inbox_rx,
            peer_tx,
            peer_rx,
            room_rx,
            room_open: true,
            state_tx,
            events_tx,
            reconnect_at: None,
            negotiation_deadline: None,
        };
        tokio::spawn(engine.run());

        (SessionHandle::new(key, command_tx, state_rx), events_rx)
    }

    pub async fn run(mut self) {
        info!("Session {} started", self.session.key);

        self.register_subscriptions();
        self.handle_room_change();
        self.acquire_media();

        loop {
            let reconnect_at = self.reconnect_at;
            let negotiation_deadline = self.negotiation_deadline;

            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(EngineCommand::Teardown) | None => {
                        self.teardown().await;
                        break;
                    }
                },

                Some(input) = self.inbox_rx.recv() => match input {
                    Input::Signal { generation, msg } => self.handle_signal(generation, msg),
                    Input::Completed { epoch, op } => self.handle_completion(epoch, op),
                },

                Some((epoch, event)) = self.peer_rx.recv() => self.handle_peer_event(epoch, event),

                changed = self.room_rx.changed(), if self.room_open => match changed {
                    Ok(()) => self.handle_room_change(),
                    Err(_) => self.room_open = false,
                },

                _ = sleep_until(reconnect_at) => self.on_reconnect_timer(),

                _ = sleep_until(negotiation_deadline) => self.on_negotiation_timeout(),
            }
        }

        info!("Session {} finished", self.session.key);
    }

    fn set_state(&mut self, state: NegotiationState) {
        let from = self.session.state;
        if from == state {
            return;
        }

        info!(
            session = %self.session.key,
            epoch = self.session.epoch,
            "{} -> {}",
            from,
            state
        );
        self.session.state = state;
        self.state_tx.send_replace(state);
        self.emit(SessionEvent::StateChanged(state));
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events_tx.send(event);
    }

    /// Reporter for async work started by the current instance.
    fn completer(&self) -> Completer {
        Completer {
            epoch: self.session.epoch,
            tx: self.inbox_tx.clone(),
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
