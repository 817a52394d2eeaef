mod session;
mod session_event;
mod session_handle;
mod session_key;
mod session_manager;

pub use session::*;
pub use session_event::SessionEvent;
pub use session_handle::SessionHandle;
pub use session_key::SessionKey;
pub use session_manager::SessionManager;
