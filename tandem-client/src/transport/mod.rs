mod room_tracker;
mod signaling_channel;
mod subscriptions;
mod transport_config;
mod transport_state;
mod ws_signaling;

pub use room_tracker::{RoomStatus, RoomTracker};
pub use signaling_channel::{SignalHandler, SignalingChannel};
pub use subscriptions::SubscriptionTable;
pub use transport_config::TransportConfig;
pub use transport_state::TransportState;
pub use ws_signaling::WsSignaling;
