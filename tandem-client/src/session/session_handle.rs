use crate::engine::EngineCommand;
use crate::session::session::NegotiationState;
use crate::session::session_key::SessionKey;
use tokio::sync::{mpsc, watch};
use tracing::debug;

/// Caller side of a running engine. For a session started with
/// `NegotiationEngine::spawn`, dropping every handle tears it down.
/// `SessionManager` keeps its own handle, so managed sessions run until
/// torn down through the manager or a handle.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    key: SessionKey,
    command_tx: mpsc::Sender<EngineCommand>,
    state_rx: watch::Receiver<NegotiationState>,
}

impl SessionHandle {
    pub(crate) fn new(
        key: SessionKey,
        command_tx: mpsc::Sender<EngineCommand>,
        state_rx: watch::Receiver<NegotiationState>,
    ) -> Self {
        Self {
            key,
            command_tx,
            state_rx,
        }
    }

    pub fn key(&self) -> SessionKey {
        self.key
    }

    pub fn state(&self) -> NegotiationState {
        *self.state_rx.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<NegotiationState> {
        self.state_rx.clone()
    }

    /// Stop tracks, close the connection object and drop subscriptions.
    /// Resolves once the session is `Closed`; calling it again is harmless.
    pub async fn teardown(&self) {
        if self.command_tx.send(EngineCommand::Teardown).await.is_err() {
            debug!("Session {} already stopped", self.key);
        }
        self.closed().await;
    }

    pub async fn closed(&self) {
        let mut rx = self.state_rx.clone();
        let _ = rx.wait_for(|s| *s == NegotiationState::Closed).await;
    }
}
