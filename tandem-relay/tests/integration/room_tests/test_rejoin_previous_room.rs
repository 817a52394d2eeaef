use tandem_core::SignalMessage;
use tandem_relay::RoomCommand;

use crate::integration::{create_test_coordinator, init_tracing, join};
use crate::utils::wait_for_signal;

#[tokio::test]
async fn test_rejoin_previous_room() {
    init_tracing();

    let (cmd_tx, mut signal_rx, _signaling) = create_test_coordinator();

    let (a, _) = join(&cmd_tx, None).await;
    let SignalMessage::RoomJoined { room_id } = wait_for_signal(&mut signal_rx, a, |m| {
        matches!(m, SignalMessage::RoomJoined { .. })
    })
    .await
    .expect("room-joined") else {
        unreachable!()
    };

    let (b, _) = join(&cmd_tx, None).await;
    wait_for_signal(&mut signal_rx, b, |m| {
        matches!(m, SignalMessage::RoomReady { .. })
    })
    .await
    .expect("room-ready");

    // b's socket drops and comes back on a new connection carrying the old room id.
    cmd_tx
        .send(RoomCommand::Disconnect { conn: b })
        .await
        .unwrap();
    let (b2, _) = join(&cmd_tx, Some(room_id)).await;

    let ready = wait_for_signal(&mut signal_rx, b2, |m| {
        matches!(m, SignalMessage::RoomReady { .. })
    })
    .await
    .expect("rejoined peer should see room-ready");
    assert_eq!(
        ready,
        SignalMessage::RoomReady {
            room_id,
            initiator: true
        }
    );

    let ready_a = wait_for_signal(&mut signal_rx, a, |m| {
        matches!(m, SignalMessage::RoomReady { .. })
    })
    .await
    .expect("remaining peer should see room-ready again");
    assert_eq!(
        ready_a,
        SignalMessage::RoomReady {
            room_id,
            initiator: false
        }
    );
}

#[tokio::test]
async fn test_rejoin_after_relay_restart_recreates_room() {
    init_tracing();

    let (cmd_tx, mut signal_rx, _signaling) = create_test_coordinator();
    let lost = tandem_core::RoomId::new();

    let (a, _) = join(&cmd_tx, Some(lost)).await;
    let joined = wait_for_signal(&mut signal_rx, a, |m| {
        matches!(m, SignalMessage::RoomJoined { .. })
    })
    .await
    .expect("room-joined");

    assert_eq!(joined, SignalMessage::RoomJoined { room_id: lost });
}
