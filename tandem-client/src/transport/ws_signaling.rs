use crate::error::TransportError;
use crate::transport::room_tracker::{RoomStatus, RoomTracker};
use crate::transport::signaling_channel::{SignalHandler, SignalingChannel};
use crate::transport::subscriptions::SubscriptionTable;
use crate::transport::transport_config::TransportConfig;
use crate::transport::transport_state::TransportState;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tandem_core::{PeerId, SignalKind, SignalMessage};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket link to the relay. A background task owns the socket and keeps
/// it alive across drops, rejoining the previous room after each reconnect.
pub struct WsSignaling {
    peer_id: PeerId,
    outbound: mpsc::UnboundedSender<SignalMessage>,
    subscriptions: SubscriptionTable,
    room_rx: watch::Receiver<RoomStatus>,
    health_rx: watch::Receiver<TransportState>,
    shutdown: watch::Sender<bool>,
}

impl WsSignaling {
    /// Fails only if the first handshake fails. Later drops are recovered in
    /// the background and show up in `health()`.
    pub async fn connect(config: TransportConfig) -> Result<Self, TransportError> {
        info!("Connecting to relay {} as {}", config.url, config.peer_id.short());
        let stream = handshake(&config).await?;

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (health_tx, health_rx) = watch::channel(TransportState::Connecting);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let subscriptions = SubscriptionTable::new();
        let tracker = RoomTracker::new();
        let room_rx = tracker.watch();

        let task = SocketTask {
            config: config.clone(),
            subscriptions: subscriptions.clone(),
            tracker,
            health_tx,
            outbound_rx,
            shutdown_rx,
        };
        tokio::spawn(task.run(stream));

        Ok(Self {
            peer_id: config.peer_id,
            outbound,
            subscriptions,
            room_rx,
            health_rx,
            shutdown,
        })
    }

    pub fn health(&self) -> watch::Receiver<TransportState> {
        self.health_rx.clone()
    }

    /// Close the socket and stop reconnecting. Safe to call repeatedly.
    pub fn disconnect(&self) {
        if !self.shutdown.send_replace(true) {
            info!("Disconnecting from relay");
        }
        self.subscriptions.clear();
    }
}

impl SignalingChannel for WsSignaling {
    fn local_peer(&self) -> PeerId {
        self.peer_id
    }

    fn send(&self, msg: SignalMessage) {
        let kind = msg.kind();
        if self.outbound.send(msg).is_err() {
            debug!("Transport closed; dropping '{}'", kind);
        }
    }

    fn subscribe(&self, kind: SignalKind, handler: SignalHandler) {
        self.subscriptions.subscribe(kind, handler);
    }

    fn unsubscribe(&self, kind: SignalKind) {
        self.subscriptions.unsubscribe(kind);
    }

    fn room(&self) -> watch::Receiver<RoomStatus> {
        self.room_rx.clone()
    }
}

async fn handshake(config: &TransportConfig) -> Result<WsStream, TransportError> {
    match tokio::time::timeout(config.connect_timeout, connect_async(config.url.as_str())).await {
        Ok(Ok((stream, _))) => Ok(stream),
        Ok(Err(e)) => Err(TransportError::Handshake {
            url: config.url.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Err(TransportError::HandshakeTimeout(config.url.clone())),
    }
}

async fn send_frame(
    sink: &mut SplitSink<WsStream, Message>,
    msg: &SignalMessage,
) -> Result<(), tungstenite::Error> {
    let json = match msg.encode() {
        Ok(json) => json,
        Err(e) => {
            error!("Dropping '{}': {}", msg.kind(), TransportError::from(e));
            return Ok(());
        }
    };

    debug!("-> '{}'", msg.kind());
    sink.send(Message::Text(json.into())).await
}

enum LinkExit {
    Shutdown,
    Lost,
}

struct SocketTask {
    config: TransportConfig,
    subscriptions: SubscriptionTable,
    tracker: RoomTracker,
    health_tx: watch::Sender<TransportState>,
    outbound_rx: mpsc::UnboundedReceiver<SignalMessage>,
    shutdown_rx: watch::Receiver<bool>,
}

impl SocketTask {
    async fn run(mut self, mut stream: WsStream) {
        loop {
            self.health_tx.send_replace(TransportState::Connected);

            if let LinkExit::Shutdown = self.pump(stream).await {
                break;
            }

            self.tracker.reset();
            match self.reconnect().await {
                Some(next) => stream = next,
                None => break,
            }
        }

        self.tracker.reset();
        self.health_tx.send_replace(TransportState::Disconnected);
        info!("Signaling link to {} closed", self.config.url);
    }

    fn stopping(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    async fn pump(&mut self, stream: WsStream) -> LinkExit {
        let (mut sink, mut source) = stream.split();

        if self.stopping() {
            let _ = sink.close().await;
            return LinkExit::Shutdown;
        }

        let join = self.tracker.join_request(self.config.peer_id);
        if let Err(e) = send_frame(&mut sink, &join).await {
            warn!("Failed to send join-room: {}", e);
            return LinkExit::Lost;
        }

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => {
                    let _ = sink.close().await;
                    return LinkExit::Shutdown;
                }

                outbound = self.outbound_rx.recv() => {
                    let Some(msg) = outbound else {
                        let _ = sink.close().await;
                        return LinkExit::Shutdown;
                    };

                    if let Err(e) = send_frame(&mut sink, &msg).await {
                        warn!("Relay link lost while sending '{}': {}", msg.kind(), e);
                        return LinkExit::Lost;
                    }
                }

                frame = source.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.on_text(text.as_str()),
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("Relay closed the link");
                        return LinkExit::Lost;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Relay link error: {}", e);
                        return LinkExit::Lost;
                    }
                },
            }
        }
    }

    fn on_text(&mut self, text: &str) {
        let msg = match SignalMessage::decode(text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Invalid frame from relay: {}", e);
                return;
            }
        };

        debug!("<- '{}'", msg.kind());
        self.tracker.observe(&msg);
        self.subscriptions.dispatch(msg);
    }

    async fn reconnect(&mut self) -> Option<WsStream> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let delay = self.config.backoff_delay(attempt);
            self.health_tx
                .send_replace(TransportState::Reconnecting { attempt });
            warn!("Relay link down; reconnect #{} in {:?}", attempt, delay);

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.shutdown_rx.changed() => return None,
            }

            self.discard_outbound();

            let result = tokio::select! {
                result = handshake(&self.config) => result,
                _ = self.shutdown_rx.changed() => return None,
            };

            match result {
                Ok(stream) => {
                    info!("Reconnected to relay after {} attempt(s)", attempt);
                    return Some(stream);
                }
                Err(e) => warn!("{}", e),
            }
        }
    }

    /// Frames queued while the link was down are not replayed.
    fn discard_outbound(&mut self) {
        while let Ok(msg) = self.outbound_rx.try_recv() {
            debug!("Dropping '{}' sent while disconnected", msg.kind());
        }
    }
}
