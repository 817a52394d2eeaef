use tandem_client::{NegotiationRole, NegotiationState};
use tandem_core::{RoomId, SdpKind, SessionDescription, SignalKind, SignalMessage};

use crate::integration::{TestSessionBuilder, init_tracing, peer_id};
use crate::utils::{MemoryEndpoint, PeerCall, eventually, wait_for_state};

fn make_initiator(endpoint: &MemoryEndpoint) {
    let room_id = RoomId::new();
    endpoint.relay_event(SignalMessage::RoomJoined { room_id });
    endpoint.relay_event(SignalMessage::RoomReady {
        room_id,
        initiator: true,
    });
}

#[tokio::test]
async fn test_glare_smaller_token_keeps_offer() {
    init_tracing();

    let endpoint = MemoryEndpoint::new(peer_id(1));
    let session = TestSessionBuilder::new("local").endpoint(endpoint.clone()).start();
    make_initiator(&endpoint);

    eventually("offer sent", || endpoint.sent_of(SignalKind::Offer).len() == 1)
        .await
        .unwrap();

    // The remote also believes it initiates, but its token is larger.
    endpoint.inject(SignalMessage::offer(
        SessionDescription::offer("remote offer"),
        peer_id(u128::MAX),
    ));
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(
        session.handle.state(),
        NegotiationState::Negotiating(NegotiationRole::Offering)
    );
    assert_eq!(session.peers.created(), 1);
    assert!(endpoint.sent_of(SignalKind::Answer).is_empty());
    assert!(!session.peers.peer(0).calls().contains(&PeerCall::CreateAnswer));

    // The remote yields and answers our offer.
    endpoint.inject(SignalMessage::answer(SessionDescription::answer("remote answer")));
    wait_for_state(&session.handle, NegotiationState::Connected)
        .await
        .unwrap();
    assert_eq!(endpoint.sent_of(SignalKind::Offer).len(), 1);
}

#[tokio::test]
async fn test_glare_larger_token_yields_and_answers() {
    init_tracing();

    let endpoint = MemoryEndpoint::new(peer_id(u128::MAX));
    let session = TestSessionBuilder::new("local").endpoint(endpoint.clone()).start();
    make_initiator(&endpoint);

    eventually("offer sent", || endpoint.sent_of(SignalKind::Offer).len() == 1)
        .await
        .unwrap();

    endpoint.inject(SignalMessage::offer(
        SessionDescription::offer("winning offer"),
        peer_id(1),
    ));

    wait_for_state(&session.handle, NegotiationState::Connected)
        .await
        .unwrap();

    // The in-flight offer was abandoned together with its connection object.
    assert_eq!(session.peers.created(), 2);
    eventually("first instance closed", || session.peers.peer(0).close_count() == 1)
        .await
        .unwrap();

    let second = session.peers.peer(1).calls();
    assert_eq!(second[0], PeerCall::AddTracks(session.media.track_ids()));
    assert!(second.contains(&PeerCall::SetRemote(SdpKind::Offer)));
    assert!(second.contains(&PeerCall::CreateAnswer));
    assert!(!second.contains(&PeerCall::CreateOffer));

    assert_eq!(endpoint.sent_of(SignalKind::Offer).len(), 1);
    assert_eq!(endpoint.sent_of(SignalKind::Answer).len(), 1);
}

#[tokio::test]
async fn test_answer_outside_offering_is_ignored() {
    init_tracing();

    let endpoint = MemoryEndpoint::new(peer_id(5));
    let session = TestSessionBuilder::new("local").endpoint(endpoint.clone()).start();

    wait_for_state(&session.handle, NegotiationState::AwaitingRoom)
        .await
        .unwrap();

    endpoint.inject(SignalMessage::answer(SessionDescription::answer("stray")));
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(session.handle.state(), NegotiationState::AwaitingRoom);
    assert!(
        !session
            .peers
            .peer(0)
            .calls()
            .iter()
            .any(|c| matches!(c, PeerCall::SetRemote(_)))
    );
}
