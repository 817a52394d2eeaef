use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection health reported by the peer connection. Losses come from either
/// the ICE or the overall connection state; recovery from the overall state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionHealth {
    #[default]
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

impl ConnectionHealth {
    /// `disconnected` and `failed` start a reconnect.
    pub fn is_failure(&self) -> bool {
        matches!(self, ConnectionHealth::Disconnected | ConnectionHealth::Failed)
    }
}

impl fmt::Display for ConnectionHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionHealth::New => "new",
            ConnectionHealth::Connecting => "connecting",
            ConnectionHealth::Connected => "connected",
            ConnectionHealth::Disconnected => "disconnected",
            ConnectionHealth::Failed => "failed",
            ConnectionHealth::Closed => "closed",
        };
        f.write_str(s)
    }
}
