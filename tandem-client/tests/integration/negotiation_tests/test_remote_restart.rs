use tandem_client::{NegotiationState, SessionEvent};
use tandem_core::{RoomId, SessionDescription, SignalKind, SignalMessage};

use crate::integration::{TestSessionBuilder, init_tracing, peer_id};
use crate::utils::{MemoryEndpoint, drain_events, eventually, wait_for_state};

#[tokio::test]
async fn test_new_offer_while_connected_restarts_instance() {
    init_tracing();

    let endpoint = MemoryEndpoint::new(peer_id(7));
    let mut session = TestSessionBuilder::new("local").endpoint(endpoint.clone()).start();
    wait_for_state(&session.handle, NegotiationState::AwaitingRoom)
        .await
        .unwrap();

    let room_id = RoomId::new();
    endpoint.relay_event(SignalMessage::RoomReady {
        room_id,
        initiator: false,
    });

    endpoint.inject(SignalMessage::offer(
        SessionDescription::offer("first"),
        peer_id(9),
    ));
    wait_for_state(&session.handle, NegotiationState::Connected)
        .await
        .unwrap();

    endpoint.inject(SignalMessage::offer(
        SessionDescription::offer("second"),
        peer_id(9),
    ));
    eventually("second answer sent", || {
        endpoint.sent_of(SignalKind::Answer).len() == 2
    })
    .await
    .unwrap();
    wait_for_state(&session.handle, NegotiationState::Connected)
        .await
        .unwrap();

    assert_eq!(session.peers.created(), 2);
    assert_eq!(session.media.acquired(), 1);

    // A remote restart is not a local failure.
    let events = drain_events(&mut session.events);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, SessionEvent::Reconnecting { .. }))
    );
}

#[tokio::test]
async fn test_offer_without_room_ready_is_answered() {
    init_tracing();

    let endpoint = MemoryEndpoint::new(peer_id(7));
    let session = TestSessionBuilder::new("local").endpoint(endpoint.clone()).start();
    wait_for_state(&session.handle, NegotiationState::AwaitingRoom)
        .await
        .unwrap();

    // The relay only forwards after ready, but an early offer is still answered.
    endpoint.inject(SignalMessage::offer(
        SessionDescription::offer("early"),
        peer_id(9),
    ));

    wait_for_state(&session.handle, NegotiationState::Connected)
        .await
        .unwrap();
    assert_eq!(endpoint.sent_of(SignalKind::Answer).len(), 1);
    assert_eq!(session.peers.created(), 1);
}
