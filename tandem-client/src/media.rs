use crate::config::MediaConstraints;
use crate::error::MediaAcquisitionError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

impl TrackKind {
    pub fn from_codec_type(kind: RTPCodecType) -> Option<Self> {
        match kind {
            RTPCodecType::Audio => Some(TrackKind::Audio),
            RTPCodecType::Video => Some(TrackKind::Video),
            _ => None,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Audio => write!(f, "audio"),
            TrackKind::Video => write!(f, "video"),
        }
    }
}

#[derive(Clone)]
pub struct LocalTrack {
    pub id: String,
    pub kind: TrackKind,
    pub track: Arc<dyn TrackLocal + Send + Sync>,
}

impl fmt::Debug for LocalTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalTrack")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Captured local stream. Outlives individual connection objects: a
/// reconnect reuses the same tracks.
#[derive(Debug, Clone)]
pub struct LocalTracks {
    pub stream_id: String,
    pub tracks: Vec<LocalTrack>,
}

impl LocalTracks {
    pub fn ids(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }
}

#[derive(Clone)]
pub struct RemoteTrack {
    pub id: String,
    pub stream_id: String,
    pub kind: TrackKind,
    pub track: Option<Arc<TrackRemote>>,
}

impl fmt::Debug for RemoteTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTrack")
            .field("id", &self.id)
            .field("stream_id", &self.stream_id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Capture and rendering side of a session. The engine owns the tracks; the
/// adapter only ever sees references.
#[async_trait]
pub trait MediaTrackAdapter: Send + Sync {
    async fn acquire_local_tracks(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<LocalTracks, MediaAcquisitionError>;

    /// Local preview.
    fn attach_local(&self, tracks: &LocalTracks);

    fn on_remote_track(&self, track: RemoteTrack);

    /// Stop capture. Called once per acquisition, on teardown.
    fn release_local_tracks(&self, tracks: &LocalTracks);
}
