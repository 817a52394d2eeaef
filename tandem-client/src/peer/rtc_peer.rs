use crate::error::NegotiationError;
use crate::media::{LocalTracks, RemoteTrack, TrackKind};
use crate::peer::peer_connection::{PeerConnection, PeerConnectionFactory};
use crate::peer::peer_event::{PeerEvent, PeerEventSink};
use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::{ConnectionHealth, IceCandidate, IceServerConfig, SdpKind, SessionDescription};
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_remote::TrackRemote;

fn connection_err(e: webrtc::Error) -> NegotiationError {
    NegotiationError::Connection(e.to_string())
}

fn health_of(state: RTCPeerConnectionState) -> ConnectionHealth {
    match state {
        RTCPeerConnectionState::Connecting => ConnectionHealth::Connecting,
        RTCPeerConnectionState::Connected => ConnectionHealth::Connected,
        RTCPeerConnectionState::Disconnected => ConnectionHealth::Disconnected,
        RTCPeerConnectionState::Failed => ConnectionHealth::Failed,
        RTCPeerConnectionState::Closed => ConnectionHealth::Closed,
        _ => ConnectionHealth::New,
    }
}

/// ICE only reports losses; recovery comes from the overall state.
fn ice_health_of(state: RTCIceConnectionState) -> Option<ConnectionHealth> {
    match state {
        RTCIceConnectionState::Disconnected => Some(ConnectionHealth::Disconnected),
        RTCIceConnectionState::Failed => Some(ConnectionHealth::Failed),
        _ => None,
    }
}

fn rtc_ice_server(config: &IceServerConfig) -> RTCIceServer {
    RTCIceServer {
        urls: config.urls.clone(),
        username: config.username.clone().unwrap_or_default(),
        credential: config.credential.clone().unwrap_or_default(),
        ..Default::default()
    }
}

/// Builds `webrtc` peer connections with the default codecs and interceptors.
pub struct RtcPeerFactory {
    api: API,
}

impl RtcPeerFactory {
    pub fn new() -> Result<Self, NegotiationError> {
        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .map_err(connection_err)?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .map_err(connection_err)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        Ok(Self { api })
    }
}

#[async_trait]
impl PeerConnectionFactory for RtcPeerFactory {
    async fn create(
        &self,
        ice_servers: &[IceServerConfig],
        events: PeerEventSink,
    ) -> Result<Arc<dyn PeerConnection>, NegotiationError> {
        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers.iter().map(rtc_ice_server).collect(),
            ..Default::default()
        };

        let pc = Arc::new(
            self.api
                .new_peer_connection(rtc_config)
                .await
                .map_err(connection_err)?,
        );

        let state_events = events.clone();
        pc.on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
            let events = state_events.clone();
            Box::pin(async move {
                info!("Peer connection state (epoch {}): {}", events.epoch(), s);
                events.emit(PeerEvent::Health(health_of(s)));
            })
        }));

        let ice_state_events = events.clone();
        pc.on_ice_connection_state_change(Box::new(move |s: RTCIceConnectionState| {
            let events = ice_state_events.clone();
            Box::pin(async move {
                debug!("ICE connection state (epoch {}): {}", events.epoch(), s);
                if let Some(health) = ice_health_of(s) {
                    events.emit(PeerEvent::Health(health));
                }
            })
        }));

        let ice_events = events.clone();
        pc.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let events = ice_events.clone();
            Box::pin(async move {
                let candidate = match c {
                    Some(c) => match c.to_json() {
                        Ok(init) => Some(IceCandidate {
                            candidate: init.candidate,
                            sdp_mid: init.sdp_mid,
                            sdp_m_line_index: init.sdp_mline_index,
                            username_fragment: init.username_fragment,
                        }),
                        Err(e) => {
                            warn!("Failed to serialize local candidate: {}", e);
                            return;
                        }
                    },
                    None => None,
                };
                events.emit(PeerEvent::LocalCandidate(candidate));
            })
        }));

        let track_events = events;
        pc.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let events = track_events.clone();
                Box::pin(async move {
                    let Some(kind) = TrackKind::from_codec_type(track.kind()) else {
                        debug!("Ignoring remote track of unknown kind");
                        return;
                    };
                    let remote = RemoteTrack {
                        id: track.id(),
                        stream_id: track.stream_id(),
                        kind,
                        track: Some(track),
                    };
                    events.emit(PeerEvent::RemoteTrack(remote));
                })
            },
        ));

        Ok(Arc::new(RtcPeer { pc }))
    }
}

pub struct RtcPeer {
    pc: Arc<RTCPeerConnection>,
}

#[async_trait]
impl PeerConnection for RtcPeer {
    async fn add_local_tracks(&self, tracks: &LocalTracks) -> Result<(), NegotiationError> {
        for local in &tracks.tracks {
            self.pc
                .add_track(Arc::clone(&local.track))
                .await
                .map_err(connection_err)?;
        }
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, NegotiationError> {
        let offer = self
            .pc
            .create_offer(None)
            .await
            .map_err(|e| NegotiationError::DescriptionCreate(e.to_string()))?;
        let sdp = offer.sdp.clone();
        self.pc
            .set_local_description(offer)
            .await
            .map_err(|e| NegotiationError::DescriptionCreate(e.to_string()))?;
        Ok(SessionDescription::offer(sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, NegotiationError> {
        let answer = self
            .pc
            .create_answer(None)
            .await
            .map_err(|e| NegotiationError::DescriptionCreate(e.to_string()))?;
        let sdp = answer.sdp.clone();
        self.pc
            .set_local_description(answer)
            .await
            .map_err(|e| NegotiationError::DescriptionCreate(e.to_string()))?;
        Ok(SessionDescription::answer(sdp))
    }

    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), NegotiationError> {
        let desc = match description.kind {
            SdpKind::Offer => RTCSessionDescription::offer(description.sdp),
            SdpKind::Answer => RTCSessionDescription::answer(description.sdp),
        }
        .map_err(|e| NegotiationError::DescriptionApply(e.to_string()))?;

        self.pc
            .set_remote_description(desc)
            .await
            .map_err(|e| NegotiationError::DescriptionApply(e.to_string()))
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), NegotiationError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment,
        };

        self.pc
            .add_ice_candidate(init)
            .await
            .map_err(|e| NegotiationError::CandidateApply(e.to_string()))
    }

    async fn close(&self) -> Result<(), NegotiationError> {
        self.pc.close().await.map_err(connection_err)
    }
}
