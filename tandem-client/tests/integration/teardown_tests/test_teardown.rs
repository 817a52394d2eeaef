use std::time::Duration;
use tandem_client::{NegotiationState, SessionEvent};
use tandem_core::{ConnectionHealth, SignalKind};

use crate::integration::{TestSessionBuilder, init_tracing, ready_pair};
use crate::utils::{drain_events, eventually, wait_for_event, wait_for_state};

#[tokio::test]
async fn test_teardown_is_idempotent() {
    init_tracing();

    let (mut a, _b) = ready_pair().await;
    wait_for_state(&a.handle, NegotiationState::Connected)
        .await
        .unwrap();
    assert_eq!(a.endpoint.handler_count(SignalKind::Offer), 1);

    a.handle.teardown().await;
    a.handle.teardown().await;

    assert_eq!(a.handle.state(), NegotiationState::Closed);
    assert_eq!(a.media.released(), 1);
    assert_eq!(a.peers.peer(0).close_count(), 1);
    for kind in SignalKind::PEER_SCOPED {
        assert_eq!(a.endpoint.handler_count(kind), 0);
    }

    let closed = drain_events(&mut a.events)
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::Closed))
        .count();
    assert_eq!(closed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_pending_reconnect() {
    init_tracing();

    let (_a, mut b) = ready_pair().await;
    wait_for_state(&b.handle, NegotiationState::Connected)
        .await
        .unwrap();

    b.peers.peer(0).emit_health(ConnectionHealth::Failed);
    wait_for_event(&mut b.events, |e| {
        matches!(e, SessionEvent::Reconnecting { .. })
    })
    .await
    .unwrap();

    b.handle.teardown().await;
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(b.handle.state(), NegotiationState::Closed);
    assert_eq!(b.peers.created(), 1);
    assert_eq!(b.media.released(), 1);
}

#[tokio::test]
async fn test_dropping_handle_tears_down() {
    init_tracing();

    let session = TestSessionBuilder::new("local").start();
    wait_for_state(&session.handle, NegotiationState::AwaitingRoom)
        .await
        .unwrap();

    let media = session.media.clone();
    let peers = session.peers.clone();
    let mut events = session.events;
    drop(session.handle);

    wait_for_event(&mut events, |e| matches!(e, SessionEvent::Closed))
        .await
        .unwrap();
    assert_eq!(media.released(), 1);
    eventually("instance closed", || peers.peer(0).close_count() == 1)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_signals_after_teardown_are_ignored() {
    init_tracing();

    let session = TestSessionBuilder::new("local").start();
    wait_for_state(&session.handle, NegotiationState::AwaitingRoom)
        .await
        .unwrap();
    session.handle.teardown().await;

    session.endpoint.inject(tandem_core::SignalMessage::offer(
        tandem_core::SessionDescription::offer("late"),
        tandem_core::PeerId::new(),
    ));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(session.endpoint.sent_of(SignalKind::Answer).is_empty());
    assert_eq!(session.peers.created(), 1);
}
