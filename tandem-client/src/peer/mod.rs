mod peer_connection;
mod peer_event;
mod rtc_peer;

pub use peer_connection::{PeerConnection, PeerConnectionFactory};
pub use peer_event::{PeerEvent, PeerEventSink};
pub use rtc_peer::{RtcPeer, RtcPeerFactory};
