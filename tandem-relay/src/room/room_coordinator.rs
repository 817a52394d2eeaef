use crate::room::room_command::RoomCommand;
use crate::room::room_manager::RoomManager;
use crate::signaling::{ConnectionId, SignalingOutput};
use std::sync::Arc;
use tandem_core::{PeerId, RoomId, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Single task that owns all room state and applies commands in arrival order.
pub struct RoomCoordinator {
    manager: RoomManager,
    command_rx: mpsc::Receiver<RoomCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomCoordinator {
    pub fn new(command_rx: mpsc::Receiver<RoomCommand>, signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            manager: RoomManager::new(),
            command_rx,
            signaling,
        }
    }

    pub async fn run(mut self) {
        info!("Room coordinator started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Room coordinator finished");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                conn,
                peer_id,
                room_id,
            } => self.handle_join(conn, peer_id, room_id).await,

            RoomCommand::Forward { conn, msg } => {
                let kind = msg.kind();
                if !kind.is_peer_scoped() {
                    warn!("Connection {} sent relay-only event '{}'", conn, kind);
                    return;
                }

                let Some(other) = self.manager.peer_of(conn) else {
                    warn!("Dropping '{}' from {}: room not ready", kind, conn);
                    return;
                };

                debug!("Forwarding '{}' {} -> {}", kind, conn, other.conn);
                self.signaling.send(other.conn, msg).await;
            }

            RoomCommand::Disconnect { conn } => {
                if let Some(room_id) = self.manager.leave(conn) {
                    info!("Connection {} left room {}", conn, room_id);
                }
            }
        }
    }

    async fn handle_join(&mut self, conn: ConnectionId, peer_id: PeerId, room_id: Option<RoomId>) {
        let outcome = self.manager.join(conn, peer_id, room_id);
        info!(
            "Peer {} ({}) joined room {}",
            peer_id.short(),
            conn,
            outcome.room_id
        );

        self.signaling
            .send(
                conn,
                SignalMessage::RoomJoined {
                    room_id: outcome.room_id,
                },
            )
            .await;

        let Some(members) = outcome.ready else {
            return;
        };

        info!("Room {} is ready", outcome.room_id);
        for member in members {
            let msg = SignalMessage::RoomReady {
                room_id: outcome.room_id,
                initiator: member.conn == conn,
            };
            self.signaling.send(member.conn, msg).await;
        }
    }
}
