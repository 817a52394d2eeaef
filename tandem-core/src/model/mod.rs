mod description;
mod health;
mod ice;
mod peer;
mod room;
mod signaling;

pub use description::{IceCandidate, SdpKind, SessionDescription};
pub use health::ConnectionHealth;
pub use ice::IceServerConfig;
pub use peer::PeerId;
pub use room::RoomId;
pub use signaling::{SignalKind, SignalMessage};
