use duplex_client::{CallState, Command, ControllerConfig, Notice};
use duplex_core::{ClientSignal, SdpType, ServerSignal};

use crate::integration::{answer_from, create_test_peer, init_tracing, offer_from, peer};

#[tokio::test]
async fn test_peer_joined_with_media_sends_offer() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(1)).await;
    p.command(Command::StartCall).await;
    p.signal(ServerSignal::PeerJoined { peer_id: peer(2) }).await;

    assert_eq!(p.state(), CallState::Negotiating);
    assert!(p.controller.has_peer_connection());

    let log = p.transports.last_log();
    assert_eq!(log.added.len(), 2);
    assert_eq!(log.local.len(), 1);
    assert_eq!(log.local[0].sdp_type, SdpType::Offer);

    let sent = p.sink.sent();
    assert_eq!(sent.len(), 1);
    let ClientSignal::Offer { target, offer } = &sent[0] else {
        panic!("expected an offer, got {:?}", sent[0]);
    };
    assert_eq!(*target, peer(2));
    assert_eq!(offer["type"], "offer");

    let notices = p.drain_notices();
    assert!(notices.contains(&Notice::PeerJoined(peer(2))));
    assert!(notices.contains(&Notice::OfferSent(peer(2))));
}

#[tokio::test]
async fn test_offer_while_idle_acquires_media_and_answers() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(2)).await;
    p.signal(offer_from(peer(1))).await;

    assert_eq!(p.capture.local_requests(), 1);
    assert_eq!(p.state(), CallState::Negotiating);
    assert_eq!(p.controller.remote_peer(), Some(peer(1)));
    assert_eq!(p.sink.answers_to(peer(1)), 1);

    let log = p.transports.last_log();
    assert_eq!(log.remote.len(), 1);
    assert_eq!(log.remote[0].sdp, "remote-offer");
    assert_eq!(log.local[0].sdp_type, SdpType::Answer);

    let notices = p.drain_notices();
    assert!(notices.contains(&Notice::IncomingCall(peer(1))));
    assert!(notices.contains(&Notice::AnswerSent(peer(1))));
}

#[tokio::test]
async fn test_answer_connects_the_call() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(1)).await;
    p.command(Command::StartCall).await;
    p.signal(ServerSignal::PeerJoined { peer_id: peer(2) }).await;
    p.signal(answer_from(peer(2))).await;

    assert_eq!(p.state(), CallState::Connected);
    assert_eq!(p.transports.last_log().remote[0].sdp, "remote-answer");

    // A repeated answer has no offer to match and changes nothing.
    p.signal(answer_from(peer(2))).await;
    assert_eq!(p.state(), CallState::Connected);
    assert_eq!(p.transports.last_log().remote.len(), 1);

    let notices = p.drain_notices();
    assert_eq!(
        notices
            .iter()
            .filter(|n| **n == Notice::PeerConnected)
            .count(),
        1
    );
    assert!(notices.contains(&Notice::CallAccepted));
}

#[tokio::test]
async fn test_answer_from_stranger_is_ignored() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(1)).await;
    p.command(Command::StartCall).await;
    p.signal(ServerSignal::PeerJoined { peer_id: peer(2) }).await;
    p.signal(answer_from(peer(9))).await;

    assert_eq!(p.state(), CallState::Negotiating);
    assert!(p.transports.last_log().remote.is_empty());
}

#[tokio::test]
async fn test_duplicate_peer_joined_keeps_one_connection() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(1)).await;
    p.command(Command::StartCall).await;
    p.signal(ServerSignal::PeerJoined { peer_id: peer(2) }).await;
    p.signal(ServerSignal::PeerJoined { peer_id: peer(2) }).await;
    p.signal(ServerSignal::PeerJoined { peer_id: peer(3) }).await;

    assert_eq!(p.transports.created_count(), 1);
    assert_eq!(p.sink.offers_to(peer(2)), 1);
    assert_eq!(p.sink.offers_to(peer(3)), 0);
    assert_eq!(p.controller.remote_peer(), Some(peer(2)));
}
