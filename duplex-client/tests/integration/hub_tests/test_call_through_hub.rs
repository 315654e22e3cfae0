use anyhow::Result;
use duplex_client::{
    ControllerConfig, ControllerHandle, EventQueue, MediaCapture, NegotiationController, Notice,
    PeerTransportFactory, RtcTransportFactory, SyntheticCapture, WsSignaling,
};
use duplex_core::{ErrorCode, PeerId};
use duplex_server::HubConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::integration::init_tracing;
use crate::utils::{FakeCapture, FakeTransportFactory, spawn_hub, wait_for_notice};

struct Participant {
    id: PeerId,
    handle: ControllerHandle,
    notices: mpsc::UnboundedReceiver<Notice>,
    task: JoinHandle<()>,
}

async fn connect(
    addr: SocketAddr,
    capture: Arc<dyn MediaCapture>,
    transports: Arc<dyn PeerTransportFactory>,
) -> Result<Participant> {
    let queue = EventQueue::new();
    let signaling = WsSignaling::connect(&format!("ws://{}/ws", addr), queue.handle()).await?;
    let config = ControllerConfig {
        ice_servers: Some(vec![]),
        ..Default::default()
    };
    let (controller, mut notices) =
        NegotiationController::new(config, capture, transports, Arc::new(signaling), queue);
    let handle = controller.handle();
    let task = tokio::spawn(controller.run());

    let Notice::SignalingConnected { local_id } =
        wait_for_notice(&mut notices, |n| matches!(n, Notice::SignalingConnected { .. })).await?
    else {
        unreachable!()
    };

    Ok(Participant {
        id: local_id,
        handle,
        notices,
        task,
    })
}

async fn join(p: &mut Participant, room: &str) -> Result<()> {
    p.handle.join_room(room);
    wait_for_notice(&mut p.notices, |n| matches!(n, Notice::RoomJoined(_))).await?;
    Ok(())
}

#[tokio::test]
async fn test_call_through_hub() {
    init_tracing();

    let addr = spawn_hub(HubConfig::default()).await.expect("hub");
    let mut host = connect(addr, FakeCapture::new(), FakeTransportFactory::new())
        .await
        .expect("host");
    let mut guest = connect(addr, FakeCapture::new(), FakeTransportFactory::new())
        .await
        .expect("guest");

    join(&mut host, "ROOM1").await.unwrap();
    host.handle.start_call();
    wait_for_notice(&mut host.notices, |n| *n == Notice::CallStarted)
        .await
        .unwrap();

    join(&mut guest, "ROOM1").await.unwrap();

    let guest_id = guest.id;
    wait_for_notice(&mut host.notices, |n| *n == Notice::OfferSent(guest_id))
        .await
        .unwrap();
    let host_id = host.id;
    wait_for_notice(&mut guest.notices, |n| *n == Notice::AnswerSent(host_id))
        .await
        .unwrap();
    wait_for_notice(&mut host.notices, |n| *n == Notice::PeerConnected)
        .await
        .unwrap();

    // Host going away ends the call on the other side.
    host.task.abort();
    wait_for_notice(&mut guest.notices, |n| *n == Notice::PeerLeft(host_id))
        .await
        .unwrap();
    wait_for_notice(&mut guest.notices, |n| *n == Notice::CallEnded)
        .await
        .unwrap();

    guest.task.abort();
}

#[tokio::test]
async fn test_third_participant_is_turned_away() {
    init_tracing();

    let addr = spawn_hub(HubConfig::default()).await.expect("hub");
    let mut a = connect(addr, FakeCapture::new(), FakeTransportFactory::new())
        .await
        .unwrap();
    let mut b = connect(addr, FakeCapture::new(), FakeTransportFactory::new())
        .await
        .unwrap();
    let mut c = connect(addr, FakeCapture::new(), FakeTransportFactory::new())
        .await
        .unwrap();

    join(&mut a, "FULL").await.unwrap();
    join(&mut b, "FULL").await.unwrap();
    c.handle.join_room("FULL");

    let notice = wait_for_notice(&mut c.notices, |n| matches!(n, Notice::HubError { .. }))
        .await
        .unwrap();
    assert!(matches!(
        notice,
        Notice::HubError {
            code: ErrorCode::RoomFull,
            ..
        }
    ));

    for p in [a, b, c] {
        p.task.abort();
    }
}

#[tokio::test]
async fn test_webrtc_call_through_hub() {
    init_tracing();

    let addr = spawn_hub(HubConfig::default()).await.expect("hub");
    let mut host = connect(
        addr,
        Arc::new(SyntheticCapture::new()),
        Arc::new(RtcTransportFactory),
    )
    .await
    .expect("host");
    let mut guest = connect(
        addr,
        Arc::new(SyntheticCapture::new()),
        Arc::new(RtcTransportFactory),
    )
    .await
    .expect("guest");

    host.handle.create_room();
    let Notice::RoomJoined(room_id) =
        wait_for_notice(&mut host.notices, |n| matches!(n, Notice::RoomJoined(_)))
            .await
            .unwrap()
    else {
        unreachable!()
    };
    host.handle.start_call();

    join(&mut guest, room_id.as_str()).await.unwrap();

    let host_id = host.id;
    wait_for_notice(&mut guest.notices, |n| *n == Notice::AnswerSent(host_id))
        .await
        .unwrap();
    wait_for_notice(&mut host.notices, |n| *n == Notice::CallAccepted)
        .await
        .unwrap();

    assert!(host.handle.end_call().await);
    assert!(guest.handle.end_call().await);

    host.task.abort();
    guest.task.abort();
}
