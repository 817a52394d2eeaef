
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Level;
use uuid::Uuid;

use tandem_client::{
    EngineDeps, IceServerProvider, NegotiationEngine, SessionConfig, SessionEvent, SessionHandle,
    SessionKey, SignalingChannel, StaticIceServers,
};
use tandem_core::PeerId;

use crate::utils::{MemoryEndpoint, MockMediaAdapter, MockPeerFactory};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Peer id with a fixed ordering, for glare tests.
pub fn peer_id(n: u128) -> PeerId {
    PeerId(Uuid::from_u128(n))
}

/// One engine wired to mocks.
pub struct TestSession {
    pub handle: SessionHandle,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
    pub endpoint: Arc<MemoryEndpoint>,
    pub media: Arc<MockMediaAdapter>,
    pub peers: Arc<MockPeerFactory>,
}

pub struct TestSessionBuilder {
    label: String,
    endpoint: Arc<MemoryEndpoint>,
    media: Arc<MockMediaAdapter>,
    ice: Arc<dyn IceServerProvider>,
    config: SessionConfig,
}

impl TestSessionBuilder {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            endpoint: MemoryEndpoint::new(PeerId::new()),
            media: MockMediaAdapter::new(),
            ice: Arc::new(StaticIceServers::default()),
            config: SessionConfig::default(),
        }
    }

    pub fn endpoint(mut self, endpoint: Arc<MemoryEndpoint>) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn media(mut self, media: Arc<MockMediaAdapter>) -> Self {
        self.media = media;
        self
    }

    pub fn ice(mut self, ice: Arc<dyn IceServerProvider>) -> Self {
        self.ice = ice;
        self
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn start(self) -> TestSession {
        let peers = MockPeerFactory::new(&self.label);
        let signaling: Arc<dyn SignalingChannel> = self.endpoint.clone();

        let deps = EngineDeps {
            signaling,
            media: self.media.clone(),
            ice: self.ice,
            peers: peers.clone(),
        };
        let (handle, events) = NegotiationEngine::spawn(SessionKey::new(), self.config, deps);

        TestSession {
            handle,
            events,
            endpoint: self.endpoint,
            media: self.media,
            peers,
        }
    }
}

/// Two sessions on linked endpoints. Neither room is ready yet.
pub fn linked_pair() -> (TestSession, TestSession) {
    let a_endpoint = MemoryEndpoint::new(PeerId::new());
    let b_endpoint = MemoryEndpoint::new(PeerId::new());
    MemoryEndpoint::link(&a_endpoint, &b_endpoint);

    let a = TestSessionBuilder::new("a").endpoint(a_endpoint).start();
    let b = TestSessionBuilder::new("b").endpoint(b_endpoint).start();
    (a, b)
}

/// Linked pair, both waiting, then seated together; `b` initiates.
pub async fn ready_pair() -> (TestSession, TestSession) {
    let (a, b) = linked_pair();
    for session in [&a, &b] {
        crate::utils::wait_for_state(&session.handle, tandem_client::NegotiationState::AwaitingRoom)
            .await
            .expect("session should reach the room stage");
    }
    MemoryEndpoint::make_ready(&a.endpoint, &b.endpoint);
    (a, b)
}
