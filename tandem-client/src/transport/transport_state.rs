use std::fmt;

/// Health of the signaling link, published by `WsSignaling::health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
    Disconnected,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportState::Connecting => write!(f, "connecting"),
            TransportState::Connected => write!(f, "connected"),
            TransportState::Reconnecting { attempt } => write!(f, "reconnecting (#{})", attempt),
            TransportState::Disconnected => write!(f, "disconnected"),
        }
    }
}
