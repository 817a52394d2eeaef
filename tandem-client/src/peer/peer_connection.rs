use crate::error::NegotiationError;
use crate::media::LocalTracks;
use crate::peer::peer_event::PeerEventSink;
use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::{IceCandidate, IceServerConfig, SessionDescription};

/// One connection object. Discarded and replaced on every reconnect.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    async fn add_local_tracks(&self, tracks: &LocalTracks) -> Result<(), NegotiationError>;

    /// Generate an offer and install it as the local description.
    async fn create_offer(&self) -> Result<SessionDescription, NegotiationError>;

    /// Generate an answer and install it as the local description.
    async fn create_answer(&self) -> Result<SessionDescription, NegotiationError>;

    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), NegotiationError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), NegotiationError>;

    async fn close(&self) -> Result<(), NegotiationError>;
}

#[async_trait]
pub trait PeerConnectionFactory: Send + Sync {
    /// Build a connection object that reports through `events`.
    async fn create(
        &self,
        ice_servers: &[IceServerConfig],
        events: PeerEventSink,
    ) -> Result<Arc<dyn PeerConnection>, NegotiationError>;
}
