use crate::media::TrackKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Handshake with {url} failed: {reason}")]
    Handshake { url: String, reason: String },

    #[error("Handshake with {0} timed out")]
    HandshakeTimeout(String),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaAcquisitionError {
    #[error("Capture permission denied")]
    PermissionDenied,

    #[error("No {0} capture device available")]
    NoDevice(TrackKind),

    #[error("Media capture failed: {0}")]
    Capture(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ICE server fetch failed: {0}")]
pub struct ConfigFetchError(pub String);

/// Failures of the connection primitive. None of these reach the caller;
/// the engine logs them and lets health or the negotiation timeout decide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationError {
    #[error("Failed to apply remote description: {0}")]
    DescriptionApply(String),

    #[error("Failed to apply ICE candidate: {0}")]
    CandidateApply(String),

    #[error("Failed to create local description: {0}")]
    DescriptionCreate(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Terminal, caller-visible session failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    MediaAcquisition(#[from] MediaAcquisitionError),

    #[error("Gave up reconnecting after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },
}
