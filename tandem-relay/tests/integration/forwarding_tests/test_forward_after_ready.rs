use tandem_core::{IceCandidate, SessionDescription, SignalMessage};
use tandem_relay::RoomCommand;

use crate::integration::{create_test_coordinator, init_tracing, join};
use crate::utils::{expect_silence, wait_for_signal};

#[tokio::test]
async fn test_offer_answer_forwarded_between_members() {
    init_tracing();

    let (cmd_tx, mut signal_rx, _signaling) = create_test_coordinator();

    let (a, _) = join(&cmd_tx, None).await;
    let (b, b_peer) = join(&cmd_tx, None).await;
    wait_for_signal(&mut signal_rx, a, |m| {
        matches!(m, SignalMessage::RoomReady { .. })
    })
    .await
    .expect("room-ready");

    let offer = SignalMessage::offer(SessionDescription::offer("v=0 offer"), b_peer);
    cmd_tx
        .send(RoomCommand::Forward {
            conn: b,
            msg: offer.clone(),
        })
        .await
        .unwrap();
    let got = wait_for_signal(&mut signal_rx, a, |m| matches!(m, SignalMessage::Offer { .. }))
        .await
        .expect("a should receive the offer");
    assert_eq!(got, offer);

    let answer = SignalMessage::answer(SessionDescription::answer("v=0 answer"));
    cmd_tx
        .send(RoomCommand::Forward {
            conn: a,
            msg: answer.clone(),
        })
        .await
        .unwrap();
    let got = wait_for_signal(&mut signal_rx, b, |m| matches!(m, SignalMessage::Answer { .. }))
        .await
        .expect("b should receive the answer");
    assert_eq!(got, answer);
}

#[tokio::test]
async fn test_candidates_keep_order() {
    init_tracing();

    let (cmd_tx, mut signal_rx, signaling) = create_test_coordinator();

    let (a, _) = join(&cmd_tx, None).await;
    let (b, _) = join(&cmd_tx, None).await;
    wait_for_signal(&mut signal_rx, a, |m| {
        matches!(m, SignalMessage::RoomReady { .. })
    })
    .await
    .expect("room-ready");

    let sent: Vec<_> = (0..5)
        .map(|i| SignalMessage::candidate(Some(IceCandidate::new(format!("candidate:{}", i)))))
        .chain(std::iter::once(SignalMessage::candidate(None)))
        .collect();

    for msg in &sent {
        cmd_tx
            .send(RoomCommand::Forward {
                conn: a,
                msg: msg.clone(),
            })
            .await
            .unwrap();
    }

    wait_for_signal(&mut signal_rx, b, |m| {
        matches!(m, SignalMessage::IceCandidate { candidate: None })
    })
    .await
    .expect("end-of-candidates should arrive");

    let received: Vec<_> = signaling
        .delivered_to(b)
        .await
        .into_iter()
        .filter(|m| matches!(m, SignalMessage::IceCandidate { .. }))
        .collect();
    assert_eq!(received, sent);
}

#[tokio::test]
async fn test_no_forward_before_ready() {
    init_tracing();

    let (cmd_tx, mut signal_rx, _signaling) = create_test_coordinator();

    let (a, a_peer) = join(&cmd_tx, None).await;
    wait_for_signal(&mut signal_rx, a, |m| {
        matches!(m, SignalMessage::RoomJoined { .. })
    })
    .await
    .expect("room-joined");

    cmd_tx
        .send(RoomCommand::Forward {
            conn: a,
            msg: SignalMessage::offer(SessionDescription::offer("v=0"), a_peer),
        })
        .await
        .unwrap();

    expect_silence(&mut signal_rx, 200)
        .await
        .expect("offer without a partner must be dropped");
}
