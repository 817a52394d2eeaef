//! Two-party session negotiation: signaling transport, candidate buffering,
//! reconnection policy and the per-session negotiation engine.

pub mod candidate_buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod ice_config;
pub mod media;
pub mod peer;
pub mod reconnect;
pub mod session;
pub mod transport;

pub use candidate_buffer::{CandidateBuffer, FlushReport};
pub use config::{MediaConstraints, SessionConfig};
pub use engine::{EngineDeps, NegotiationEngine};
pub use error::*;
pub use ice_config::{IceServerProvider, StaticIceServers};
pub use media::{LocalTrack, LocalTracks, MediaTrackAdapter, RemoteTrack, TrackKind};
pub use peer::{PeerConnection, PeerConnectionFactory, PeerEvent, PeerEventSink, RtcPeerFactory};
pub use reconnect::{Backoff, ReconnectPolicy};
pub use session::*;
pub use transport::*;
