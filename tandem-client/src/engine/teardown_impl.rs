use crate::engine::NegotiationEngine;
use crate::session::{NegotiationState, SessionEvent};
use tracing::{info, warn};

impl NegotiationEngine {
    /// Release everything the session owns. Valid from any state, including
    /// `Failed`; a second call finds nothing left to release.
    pub(super) async fn teardown(&mut self) {
        if self.session.state == NegotiationState::Closed {
            return;
        }

        info!(session = %self.session.key, "Tearing down in {}", self.session.state);

        self.session.next_instance();
        self.session.generation += 1;
        self.session.pending_offer = None;
        self.reconnect_at = None;
        self.unregister_subscriptions();

        if let Some(pc) = self.take_instance() {
            if let Err(e) = pc.close().await {
                warn!(session = %self.session.key, "Failed to close connection object: {}", e);
            }
        }

        if let Some(tracks) = self.local_tracks.take() {
            self.deps.media.release_local_tracks(&tracks);
        }

        self.set_state(NegotiationState::Closed);
        self.emit(SessionEvent::Closed);
    }
}
