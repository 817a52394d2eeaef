use crate::reconnect::ReconnectPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tandem_core::IceServerConfig;
use tandem_core::utils::default_ice_servers;

/// Which local tracks to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub constraints: MediaConstraints,
    pub reconnect: ReconnectPolicy,
    /// How long one instance may sit in `Negotiating` before it counts as a failure.
    pub negotiation_timeout: Duration,
    /// Used when the ICE server provider fails or returns nothing.
    pub fallback_ice_servers: Vec<IceServerConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            constraints: MediaConstraints::default(),
            reconnect: ReconnectPolicy::default(),
            negotiation_timeout: Duration::from_secs(20),
            fallback_ice_servers: default_ice_servers(),
        }
    }
}
