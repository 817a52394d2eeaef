use crate::engine::NegotiationEngine;
use crate::error::SessionError;
use crate::session::{NegotiationState, SessionEvent};
use tokio::time::Instant;
use tracing::{error, info, warn};

impl NegotiationEngine {
    /// Discard the instance and schedule a retry, or give up when the
    /// policy is exhausted. Local tracks are kept for the next instance.
    pub(super) fn on_connection_failure(&mut self, reason: &str) {
        if matches!(
            self.session.state,
            NegotiationState::Reconnecting | NegotiationState::Failed | NegotiationState::Closed
        ) {
            return;
        }

        let policy = self.config.reconnect;
        let attempt = self.session.reconnect_attempt;
        if !policy.should_retry(attempt) {
            self.exhaust();
            return;
        }

        let next = attempt + 1;
        let delay = policy.next_delay(next);
        warn!(
            session = %self.session.key,
            "Connection failure ({}); reconnect #{} in {:?}",
            reason,
            next,
            delay
        );

        if let Some(pc) = self.take_instance() {
            self.close_in_background(pc);
        }
        self.session.reconnect_attempt = next;
        self.session.pending_offer = None;
        self.session.next_instance();
        self.session.generation += 1;
        self.register_subscriptions();

        self.reconnect_at = Some(Instant::now() + delay);
        self.set_state(NegotiationState::Reconnecting);
        self.emit(SessionEvent::Reconnecting {
            attempt: next,
            delay,
        });
    }

    fn exhaust(&mut self) {
        let attempts = self.session.reconnect_attempt;
        error!(
            session = %self.session.key,
            "Giving up after {} reconnect attempt(s)",
            attempts
        );

        if let Some(pc) = self.take_instance() {
            self.close_in_background(pc);
        }
        self.session.next_instance();
        self.session.generation += 1;
        self.unregister_subscriptions();
        self.reconnect_at = None;

        self.fail(SessionError::ReconnectExhausted { attempts });
    }

    pub(super) fn fail(&mut self, err: SessionError) {
        self.set_state(NegotiationState::Failed);
        self.emit(SessionEvent::Failed(err));
    }

    pub(super) fn on_reconnect_timer(&mut self) {
        self.reconnect_at = None;
        if self.session.state != NegotiationState::Reconnecting {
            return;
        }

        info!(
            session = %self.session.key,
            "Reconnect attempt #{}",
            self.session.reconnect_attempt
        );
        self.set_state(NegotiationState::MediaReady);
        self.instantiate();
    }

    pub(super) fn arm_negotiation_deadline(&mut self) {
        self.negotiation_deadline = Some(Instant::now() + self.config.negotiation_timeout);
    }

    pub(super) fn on_negotiation_timeout(&mut self) {
        self.negotiation_deadline = None;
        if !self.session.state.is_negotiating() {
            return;
        }

        warn!(
            session = %self.session.key,
            "Negotiation stalled for {:?} in {}",
            self.config.negotiation_timeout,
            self.session.state
        );
        self.on_connection_failure("negotiation timeout");
    }
}
