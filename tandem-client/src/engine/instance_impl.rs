use crate::engine::completion_impl::Completion;
use crate::engine::{Input, NegotiationEngine};
use crate::peer::{PeerConnection, PeerEventSink};
use crate::session::{NegotiationState, PendingOffer, SessionKey};
use std::sync::Arc;
use tandem_core::{IceCandidate, SignalKind};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

impl NegotiationEngine {
    /// (Re)bind offer/answer/candidate handlers to the current generation.
    /// Replaces every handler of those kinds on the channel.
    pub(super) fn register_subscriptions(&mut self) {
        let generation = self.session.generation;

        for kind in SignalKind::PEER_SCOPED {
            self.deps.signaling.unsubscribe(kind);

            let tx = self.inbox_tx.clone();
            self.deps.signaling.subscribe(
                kind,
                Arc::new(move |msg| {
                    let _ = tx.send(Input::Signal { generation, msg });
                }),
            );
        }
    }

    pub(super) fn unregister_subscriptions(&mut self) {
        for kind in SignalKind::PEER_SCOPED {
            self.deps.signaling.unsubscribe(kind);
        }
    }

    /// Fetch ICE servers, build a connection object and attach local tracks.
    pub(super) fn instantiate(&mut self) {
        let Some(tracks) = self.local_tracks.clone() else {
            warn!(session = %self.session.key, "No local tracks; cannot create connection object");
            return;
        };

        let epoch = self.session.epoch;
        let ice = self.deps.ice.clone();
        let factory = self.deps.peers.clone();
        let fallback = self.config.fallback_ice_servers.clone();
        let sink = PeerEventSink::new(epoch, self.peer_tx.clone());
        let completer = self.completer();
        let key = self.session.key;

        debug!(session = %key, "Creating connection object for epoch {}", epoch);

        tokio::spawn(async move {
            let servers = match ice.fetch_ice_servers().await {
                Ok(servers) if !servers.is_empty() => servers,
                Ok(_) => fallback,
                Err(e) => {
                    warn!(session = %key, "{}; using default STUN servers", e);
                    fallback
                }
            };

            let result = match factory.create(&servers, sink).await {
                Ok(pc) => match pc.add_local_tracks(&tracks).await {
                    Ok(()) => Ok(pc),
                    Err(e) => {
                        let _ = pc.close().await;
                        Err(e)
                    }
                },
                Err(e) => Err(e),
            };

            if let Some(Completion::Instantiated(Ok(pc))) =
                completer.send(Completion::Instantiated(result))
            {
                let _ = pc.close().await;
            }
        });
    }

    pub(super) fn install_instance(&mut self, pc: Arc<dyn PeerConnection>) {
        self.applier = Some(spawn_applier(self.session.key, pc.clone()));
        self.peer = Some(pc);
    }

    /// Detach the current connection object. Local tracks stay untouched.
    pub(super) fn take_instance(&mut self) -> Option<Arc<dyn PeerConnection>> {
        self.applier = None;
        self.negotiation_deadline = None;
        self.peer.take()
    }

    pub(super) fn close_in_background(&self, pc: Arc<dyn PeerConnection>) {
        let key = self.session.key;
        tokio::spawn(async move {
            if let Err(e) = pc.close().await {
                warn!(session = %key, "Failed to close connection object: {}", e);
            }
        });
    }

    /// The remote started over: drop the instance and answer on a fresh one.
    /// Not counted as a reconnect attempt.
    pub(super) fn restart_instance(&mut self, offer: PendingOffer) {
        info!(session = %self.session.key, "Remote restarted negotiation; replacing connection object");

        if let Some(pc) = self.take_instance() {
            self.close_in_background(pc);
        }
        self.session.next_instance();
        self.session.pending_offer = Some(offer);
        self.set_state(NegotiationState::MediaReady);
        self.instantiate();
    }
}

/// Applies remote candidates for one instance strictly in arrival order.
/// Stops when the instance drops its sender.
fn spawn_applier(
    session: SessionKey,
    pc: Arc<dyn PeerConnection>,
) -> mpsc::UnboundedSender<IceCandidate> {
    let (tx, mut rx) = mpsc::unbounded_channel::<IceCandidate>();

    tokio::spawn(async move {
        while let Some(candidate) = rx.recv().await {
            if let Err(e) = pc.add_ice_candidate(candidate).await {
                warn!(session = %session, "{}", e);
            }
        }
    });

    tx
}
