use crate::error::SessionError;
use crate::media::RemoteTrack;
use crate::session::session::{NegotiationRole, NegotiationState};
use std::time::Duration;
use tandem_core::{ConnectionHealth, RoomId};

/// Observable session lifecycle.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged(NegotiationState),
    RoomAssigned(RoomId),
    RoleAssigned(NegotiationRole),
    Reconnecting { attempt: u32, delay: Duration },
    RemoteTrack(RemoteTrack),
    HealthChanged(ConnectionHealth),
    /// Terminal. Emitted at most once.
    Failed(SessionError),
    Closed,
}
