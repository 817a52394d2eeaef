use crate::engine::NegotiationEngine;
use crate::peer::PeerEvent;
use crate::session::{Epoch, SessionEvent};
use tandem_core::{ConnectionHealth, SignalMessage};
use tracing::{debug, info, warn};

impl NegotiationEngine {
    pub(super) fn handle_peer_event(&mut self, epoch: Epoch, event: PeerEvent) {
        if epoch != self.session.epoch {
            debug!(session = %self.session.key, "Dropping event from epoch {}", epoch);
            return;
        }

        match event {
            PeerEvent::LocalCandidate(candidate) => {
                if candidate.is_none() {
                    debug!(session = %self.session.key, "Local gathering complete");
                }
                self.deps.signaling.send(SignalMessage::candidate(candidate));
            }

            PeerEvent::Health(health) => self.on_health(health),

            PeerEvent::RemoteTrack(track) => {
                info!(session = %self.session.key, "Remote {} track {}", track.kind, track.id);
                self.deps.media.on_remote_track(track.clone());
                self.emit(SessionEvent::RemoteTrack(track));
            }
        }
    }

    fn on_health(&mut self, health: ConnectionHealth) {
        debug!(session = %self.session.key, "Health: {}", health);
        self.emit(SessionEvent::HealthChanged(health));

        if health == ConnectionHealth::Connected {
            if self.session.reconnect_attempt > 0 {
                info!(
                    session = %self.session.key,
                    "Connection restored after {} attempt(s)",
                    self.session.reconnect_attempt
                );
            }
            self.session.reconnect_attempt = 0;
            return;
        }

        if health.is_failure() && self.session.state.is_engaged() {
            warn!(session = %self.session.key, "Connection {} in {}", health, self.session.state);
            self.on_connection_failure("peer connection lost");
        }
    }
}
