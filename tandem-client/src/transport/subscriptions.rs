use crate::transport::signaling_channel::SignalHandler;
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{SignalKind, SignalMessage};
use tracing::debug;

#[derive(Clone, Default)]
pub struct SubscriptionTable {
    handlers: Arc<DashMap<SignalKind, Vec<SignalHandler>>>,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: SignalKind, handler: SignalHandler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    pub fn unsubscribe(&self, kind: SignalKind) {
        self.handlers.remove(&kind);
    }

    pub fn clear(&self) {
        self.handlers.clear();
    }

    pub fn handler_count(&self, kind: SignalKind) -> usize {
        self.handlers.get(&kind).map(|h| h.len()).unwrap_or(0)
    }

    /// Invoke every handler registered for the message's kind. Returns how
    /// many ran.
    pub fn dispatch(&self, msg: SignalMessage) -> usize {
        let kind = msg.kind();
        // Clone out of the map so handlers can (un)subscribe without deadlocking.
        let handlers = match self.handlers.get(&kind) {
            Some(entry) => entry.value().clone(),
            None => {
                debug!("No handler for '{}'", kind);
                return 0;
            }
        };

        for handler in &handlers {
            handler(msg.clone());
        }
        handlers.len()
    }
}
