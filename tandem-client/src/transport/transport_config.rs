use std::time::Duration;
use tandem_core::PeerId;

/// Signaling link settings.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Relay endpoint, e.g. `ws://127.0.0.1:8080/ws`.
    pub url: String,
    pub peer_id: PeerId,
    pub connect_timeout: Duration,
    /// First reconnect delay; doubles per failed attempt.
    pub reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8080/ws".to_owned(),
            peer_id: PeerId::new(),
            connect_timeout: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let scale = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.reconnect_delay
            .saturating_mul(scale)
            .min(self.max_reconnect_delay)
    }
}
