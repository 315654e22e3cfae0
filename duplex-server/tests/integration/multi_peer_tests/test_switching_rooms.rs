use duplex_core::{PeerId, RoomId, ServerSignal};

use crate::integration::{create_test_hub, init_tracing};

#[tokio::test]
async fn test_joining_another_room_leaves_the_first() {
    init_tracing();

    let (hub, signaling) = create_test_hub(2);
    let a = PeerId::new();
    let b = PeerId::new();
    hub.join(a, "R1").await;
    hub.join(b, "R1").await;
    signaling.clear().await;

    hub.join(b, "R2").await;

    assert_eq!(
        signaling.received_by(&a).await,
        vec![ServerSignal::PeerLeft { peer_id: b }]
    );
    assert_eq!(hub.registry().room_of(&b), RoomId::parse("R2"));
    assert_eq!(
        hub.registry().members(&RoomId::parse("R1").unwrap()),
        vec![a]
    );
}

#[tokio::test]
async fn test_create_room_generates_unused_code() {
    init_tracing();

    let (hub, signaling) = create_test_hub(2);
    let a = PeerId::new();

    let room_id = hub.create_room(a).await;

    assert_eq!(room_id.as_str().len(), 6);
    assert_eq!(hub.registry().room_of(&a), Some(room_id.clone()));
    assert_eq!(
        signaling.received_by(&a).await,
        vec![ServerSignal::Joined { room_id }]
    );
}
