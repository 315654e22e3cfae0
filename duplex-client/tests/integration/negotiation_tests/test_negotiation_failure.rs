use duplex_client::{CallState, Command, ControllerConfig, ControllerEvent, Notice};
use duplex_core::ServerSignal;
use serde_json::json;

use crate::integration::{answer_from, create_test_peer, init_tracing, offer_from, peer};

#[tokio::test]
async fn test_transport_creation_failure_keeps_media() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(1)).await;
    p.command(Command::StartCall).await;
    p.transports.fail_create(true);
    p.signal(ServerSignal::PeerJoined { peer_id: peer(2) }).await;

    assert_eq!(p.state(), CallState::MediaAcquired);
    assert!(!p.controller.has_peer_connection());
    assert!(
        p.drain_notices()
            .iter()
            .any(|n| matches!(n, Notice::NegotiationFailed(_)))
    );

    p.transports.fail_create(false);
    p.command(Command::StartCall).await;
    assert_eq!(p.state(), CallState::Negotiating);
    assert_eq!(p.sink.offers_to(peer(2)), 1);
}

#[tokio::test]
async fn test_rejected_offer_leaves_prior_state() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(2)).await;
    p.command(Command::StartCall).await;
    p.transports.fail_remote_description(true);

    p.signal(offer_from(peer(1))).await;

    assert_eq!(p.state(), CallState::MediaAcquired);
    assert_eq!(p.transports.open_count(), 0);
    assert_eq!(p.sink.answers_to(peer(1)), 0);
    assert_eq!(p.capture.live_tracks(), 2);
}

#[tokio::test]
async fn test_rejected_answer_is_reported() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(1)).await;
    p.command(Command::StartCall).await;
    p.transports.fail_remote_description(true);
    p.signal(ServerSignal::PeerJoined { peer_id: peer(2) }).await;
    assert_eq!(p.sink.offers_to(peer(2)), 1);
    p.drain_notices();

    p.signal(answer_from(peer(2))).await;

    assert_eq!(p.state(), CallState::Negotiating);
    assert_eq!(p.transports.open_count(), 1);
    let notices = p.drain_notices();
    assert!(
        notices
            .iter()
            .any(|n| matches!(n, Notice::NegotiationFailed(_)))
    );
    assert!(!notices.contains(&Notice::CallAccepted));
    assert!(!notices.contains(&Notice::PeerConnected));
}

#[tokio::test]
async fn test_malformed_offer_is_reported() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(2)).await;
    p.signal(ServerSignal::Offer {
        offer: json!({"type": "answer", "sdp": "v=0"}),
        sender: peer(1),
    })
    .await;

    assert_eq!(p.state(), CallState::Idle);
    assert_eq!(p.capture.local_requests(), 0);
    assert!(
        p.drain_notices()
            .iter()
            .any(|n| matches!(n, Notice::NegotiationFailed(_)))
    );
}

#[tokio::test]
async fn test_lost_hub_is_reported() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(1)).await;
    p.signal(ServerSignal::Joined {
        room_id: duplex_core::RoomId::parse("R1").unwrap(),
    })
    .await;
    assert!(p.controller.room().is_some());

    p.controller
        .handle_event(ControllerEvent::SignalingClosed)
        .await;
    assert!(p.controller.room().is_none());

    p.sink.close();
    p.command(Command::StartCall).await;
    p.signal(ServerSignal::PeerJoined { peer_id: peer(2) }).await;

    let unavailable = p
        .drain_notices()
        .iter()
        .filter(|n| matches!(n, Notice::SignalingUnavailable(_)))
        .count();
    assert_eq!(unavailable, 2);
}

#[tokio::test]
async fn test_blank_room_is_rejected_locally() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.command(Command::JoinRoom("   ".into())).await;
    p.command(Command::JoinRoom(" ABC123 ".into())).await;

    assert!(p.drain_notices().contains(&Notice::InvalidRoom));
    assert_eq!(
        p.sink.sent(),
        vec![duplex_core::ClientSignal::Join {
            room_id: "ABC123".into()
        }]
    );
}
