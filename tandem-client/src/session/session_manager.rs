use crate::config::SessionConfig;
use crate::engine::{EngineDeps, NegotiationEngine};
use crate::session::session_event::SessionEvent;
use crate::session::session_handle::SessionHandle;
use crate::session::session_key::SessionKey;
use dashmap::DashMap;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Registry of running sessions. Sessions drop out on their own once closed.
/// The registry holds a handle per session, so dropping the handle returned
/// by `start` does not stop it. Each session's `EngineDeps` must carry its
/// own signaling channel.
#[derive(Clone, Default)]
pub struct SessionManager {
    sessions: Arc<DashMap<SessionKey, SessionHandle>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(
        &self,
        config: SessionConfig,
        deps: EngineDeps,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<SessionEvent>) {
        let key = SessionKey::new();
        let (handle, events) = NegotiationEngine::spawn(key, config, deps);
        self.sessions.insert(key, handle.clone());

        let sessions = self.sessions.clone();
        let watcher = handle.clone();
        tokio::spawn(async move {
            watcher.closed().await;
            sessions.remove(&key);
            info!("Session {} removed", key);
        });

        (handle, events)
    }

    pub fn get(&self, key: &SessionKey) -> Option<SessionHandle> {
        self.sessions.get(key).map(|h| h.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Returns false when no such session is running.
    pub async fn teardown(&self, key: &SessionKey) -> bool {
        let Some(handle) = self.get(key) else {
            return false;
        };
        handle.teardown().await;
        true
    }

    pub async fn teardown_all(&self) {
        let handles: Vec<SessionHandle> = self.sessions.iter().map(|e| e.value().clone()).collect();
        join_all(handles.iter().map(|h| h.teardown())).await;
    }
}
