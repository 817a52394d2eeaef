use anyhow::Result;
use std::time::Duration;
use tandem_core::SignalMessage;
use tandem_relay::ConnectionId;
use tokio::sync::mpsc;

use super::mock_signaling::Delivered;

/// Timeout for signal delivery (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 2000;

/// Wait for the next message delivered to `conn` that satisfies `pred`,
/// skipping everything else.
pub async fn wait_for_signal<F>(
    signal_rx: &mut mpsc::UnboundedReceiver<Delivered>,
    conn: ConnectionId,
    pred: F,
) -> Result<SignalMessage>
where
    F: Fn(&SignalMessage) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(SIGNAL_TIMEOUT_MS);

    loop {
        match tokio::time::timeout_at(deadline, signal_rx.recv()).await {
            Ok(Some(d)) if d.conn == conn && pred(&d.msg) => return Ok(d.msg),
            Ok(Some(_)) => continue,
            Ok(None) => anyhow::bail!("Signal channel closed"),
            Err(_) => anyhow::bail!("Timeout waiting for signal to {}", conn),
        }
    }
}

/// Assert nothing reaches the mock within `ms`.
pub async fn expect_silence(
    signal_rx: &mut mpsc::UnboundedReceiver<Delivered>,
    ms: u64,
) -> Result<()> {
    match tokio::time::timeout(Duration::from_millis(ms), signal_rx.recv()).await {
        Ok(Some(d)) => anyhow::bail!("Unexpected '{}' to {}", d.msg.kind(), d.conn),
        _ => Ok(()),
    }
}
