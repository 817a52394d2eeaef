use crate::room::RoomCommand;
use crate::signaling::{ConnectionId, SignalingService};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tandem_core::SignalMessage;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ConnectionId::new(), service))
}

async fn handle_socket(socket: WebSocket, conn: ConnectionId, service: SignalingService) {
    info!("New WebSocket connection: {}", conn);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_connection(conn, tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                let text = match msg {
                    Message::Text(text) => text,
                    Message::Close(_) => break,
                    _ => continue,
                };

                let signal = match SignalMessage::decode(text.as_str()) {
                    Ok(signal) => signal,
                    Err(e) => {
                        warn!("Invalid SignalMessage from {}: {}", conn, e);
                        continue;
                    }
                };

                let cmd = match signal {
                    SignalMessage::JoinRoom { peer_id, room_id } => RoomCommand::Join {
                        conn,
                        peer_id,
                        room_id,
                    },
                    msg => RoomCommand::Forward { conn, msg },
                };

                if let Err(e) = service.room_cmd_tx.send(cmd).await {
                    error!("Room coordinator died: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_connection(&conn);
    let _ = service
        .room_cmd_tx
        .send(RoomCommand::Disconnect { conn })
        .await;
    info!("WebSocket disconnected: {}", conn);
}
