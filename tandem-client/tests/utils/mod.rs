pub mod memory_relay;

pub use memory_relay::*;
pub use mock_ice::*;
pub use mock_media::*;
pub use mock_peer::*;
pub use session_helpers::*;
