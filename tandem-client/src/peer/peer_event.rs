use crate::media::RemoteTrack;
use crate::session::Epoch;
use tandem_core::{ConnectionHealth, IceCandidate};
use tokio::sync::mpsc;

/// What a connection object reports back to its engine.
#[derive(Debug, Clone)]
pub enum PeerEvent {
    /// `None` marks the end of local gathering.
    LocalCandidate(Option<IceCandidate>),
    Health(ConnectionHealth),
    RemoteTrack(RemoteTrack),
}

/// Event sender bound to one session instance. Events from a discarded
/// instance carry a stale epoch and are ignored by the engine.
#[derive(Debug, Clone)]
pub struct PeerEventSink {
    epoch: Epoch,
    tx: mpsc::UnboundedSender<(Epoch, PeerEvent)>,
}

impl PeerEventSink {
    pub(crate) fn new(epoch: Epoch, tx: mpsc::UnboundedSender<(Epoch, PeerEvent)>) -> Self {
        Self { epoch, tx }
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Returns false once the engine is gone.
    pub fn emit(&self, event: PeerEvent) -> bool {
        self.tx.send((self.epoch, event)).is_ok()
    }
}
