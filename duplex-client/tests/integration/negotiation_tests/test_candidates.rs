use duplex_client::{
    CallState, Command, ConnectionState, ControllerConfig, TransportEvent,
};
use duplex_core::{IceCandidate, ServerSignal};

use crate::integration::{
    candidate_from, create_test_peer, init_tracing, offer_from, peer,
};

fn local_candidate() -> TransportEvent {
    TransportEvent::LocalCandidate(IceCandidate {
        candidate: "candidate:9 1 udp 1 192.168.1.9 9999 typ host".into(),
        sdp_mid: Some("0".into()),
        sdp_m_line_index: Some(0),
        username_fragment: None,
    })
}

#[tokio::test]
async fn test_early_candidates_are_dropped_by_default() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(2)).await;
    p.signal(candidate_from(peer(1), 1)).await;
    assert_eq!(p.controller.pending_candidate_count(), 0);

    p.signal(offer_from(peer(1))).await;
    assert!(p.transports.last_log().candidates.is_empty());
}

#[tokio::test]
async fn test_early_candidates_are_held_when_buffering() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig {
        buffer_early_candidates: true,
        ..Default::default()
    });
    p.welcome(peer(2)).await;
    p.signal(candidate_from(peer(1), 1)).await;
    p.signal(candidate_from(peer(1), 2)).await;
    p.signal(candidate_from(peer(5), 3)).await;
    assert_eq!(p.controller.pending_candidate_count(), 3);

    p.signal(offer_from(peer(1))).await;

    let log = p.transports.last_log();
    assert_eq!(log.candidates.len(), 2);
    assert!(log.candidates[0].candidate.starts_with("candidate:1"));
    assert_eq!(p.controller.pending_candidate_count(), 0);
}

#[tokio::test]
async fn test_candidates_apply_once_connection_exists() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(2)).await;
    p.signal(offer_from(peer(1))).await;
    p.signal(candidate_from(peer(1), 1)).await;
    p.signal(candidate_from(peer(8), 2)).await;

    assert_eq!(p.transports.last_log().candidates.len(), 1);
}

#[tokio::test]
async fn test_local_candidates_go_to_remote() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(1)).await;
    p.command(Command::StartCall).await;
    p.signal(ServerSignal::PeerJoined { peer_id: peer(2) }).await;

    p.transports.notifier(0).notify(local_candidate());
    p.controller.process_queued().await;

    assert_eq!(p.sink.candidates_to(peer(2)), 1);
}

#[tokio::test]
async fn test_events_from_discarded_connection_are_ignored() {
    init_tracing();

    let mut p = create_test_peer(ControllerConfig::default());
    p.welcome(peer(3)).await;
    p.command(Command::StartCall).await;
    p.signal(ServerSignal::PeerJoined { peer_id: peer(2) }).await;
    // Yielding to the lower id replaces the first connection.
    p.signal(offer_from(peer(2))).await;
    assert_eq!(p.transports.created_count(), 2);

    let stale = p.transports.notifier(0);
    stale.notify(local_candidate());
    stale.notify(TransportEvent::StateChanged(ConnectionState::Connected));
    p.controller.process_queued().await;

    assert_eq!(p.sink.candidates_to(peer(2)), 0);
    assert_eq!(p.state(), CallState::Negotiating);

    p.transports
        .notifier(1)
        .notify(TransportEvent::StateChanged(ConnectionState::Connected));
    p.controller.process_queued().await;
    assert_eq!(p.state(), CallState::Connected);

    p.command(Command::EndCall { done: None }).await;
    p.transports.notifier(1).notify(local_candidate());
    p.controller.process_queued().await;
    assert_eq!(p.sink.candidates_to(peer(2)), 0);
}
