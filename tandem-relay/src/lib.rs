//! Reference relay for two-party sessions: pairs WebSocket clients into
//! two-seat rooms and forwards offer/answer/ICE frames between room members.

mod room;
mod signaling;

pub use room::*;
pub use signaling::*;

use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;

/// Spawn the room coordinator and build the router serving `/ws`.
/// Must be called from inside a tokio runtime.
pub fn relay_router() -> Router {
    let (cmd_tx, cmd_rx) = mpsc::channel::<RoomCommand>(256);
    let service = SignalingService::new(cmd_tx);

    let coordinator = RoomCoordinator::new(cmd_rx, Arc::new(service.clone()));
    tokio::spawn(coordinator.run());

    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(service)
}

pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Signaling relay listening on ws://{}/ws", addr);
    }
    axum::serve(listener, relay_router()).await
}
