use std::sync::{Arc, Mutex, Weak};
use tandem_client::{RoomStatus, RoomTracker, SignalHandler, SignalingChannel, SubscriptionTable};
use tandem_core::{PeerId, RoomId, SignalKind, SignalMessage};
use tokio::sync::watch;

/// In-process stand-in for the relay link. Two endpoints can be linked so
/// each one's sends are dispatched to the other; an unlinked endpoint lets a
/// test script the remote side with `inject`.
pub struct MemoryEndpoint {
    peer_id: PeerId,
    subscriptions: SubscriptionTable,
    tracker: Mutex<RoomTracker>,
    room_rx: watch::Receiver<RoomStatus>,
    partner: Mutex<Option<Weak<MemoryEndpoint>>>,
    sent: Mutex<Vec<SignalMessage>>,
}

impl MemoryEndpoint {
    pub fn new(peer_id: PeerId) -> Arc<Self> {
        let tracker = RoomTracker::new();
        let room_rx = tracker.watch();

        Arc::new(Self {
            peer_id,
            subscriptions: SubscriptionTable::new(),
            tracker: Mutex::new(tracker),
            room_rx,
            partner: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn link(a: &Arc<Self>, b: &Arc<Self>) {
        *a.partner.lock().unwrap() = Some(Arc::downgrade(b));
        *b.partner.lock().unwrap() = Some(Arc::downgrade(a));
    }

    /// Seat both endpoints in one room; `b` completes it and initiates.
    pub fn make_ready(a: &Arc<Self>, b: &Arc<Self>) -> RoomId {
        let room_id = RoomId::new();
        a.relay_event(SignalMessage::RoomJoined { room_id });
        b.relay_event(SignalMessage::RoomJoined { room_id });
        b.relay_event(SignalMessage::RoomReady {
            room_id,
            initiator: true,
        });
        a.relay_event(SignalMessage::RoomReady {
            room_id,
            initiator: false,
        });
        room_id
    }

    /// A message produced by the relay itself.
    pub fn relay_event(&self, msg: SignalMessage) {
        self.tracker.lock().unwrap().observe(&msg);
        self.subscriptions.dispatch(msg);
    }

    /// A message forwarded from the remote participant.
    pub fn inject(&self, msg: SignalMessage) {
        self.subscriptions.dispatch(msg);
    }

    pub fn lose_room(&self) {
        self.tracker.lock().unwrap().reset();
    }

    pub fn sent(&self) -> Vec<SignalMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_of(&self, kind: SignalKind) -> Vec<SignalMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.kind() == kind)
            .collect()
    }

    pub fn handler_count(&self, kind: SignalKind) -> usize {
        self.subscriptions.handler_count(kind)
    }
}

impl SignalingChannel for MemoryEndpoint {
    fn local_peer(&self) -> PeerId {
        self.peer_id
    }

    fn send(&self, msg: SignalMessage) {
        self.sent.lock().unwrap().push(msg.clone());

        let partner = self.partner.lock().unwrap().clone();
        if let Some(partner) = partner.and_then(|p| p.upgrade()) {
            partner.inject(msg);
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
