use crate::room::{JoinOutcome, LeaveOutcome, RelayKind, RelayOutcome, RoomRegistry};
use crate::signaling::SignalingOutput;
use duplex_core::{ClientSignal, ErrorCode, PeerId, RoomId, ServerSignal, SignalPayload};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The signaling hub: room membership plus message routing.
///
/// Offer, answer and candidate payloads are never looked at, only forwarded.
#[derive(Clone)]
pub struct RoomManager {
    registry: Arc<RoomRegistry>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomManager {
    pub fn new(capacity: usize, signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            registry: Arc::new(RoomRegistry::new(capacity)),
            signaling,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Entry point for a decoded frame from `peer_id`.
    pub async fn handle_signal(&self, peer_id: PeerId, signal: ClientSignal) {
        match signal {
            ClientSignal::Join { room_id } => self.join(peer_id, &room_id).await,
            ClientSignal::CreateRoom => {
                self.create_room(peer_id).await;
            }
            ClientSignal::Offer { target, offer } => {
                self.relay(RelayKind::Offer, peer_id, target, offer).await;
            }
            ClientSignal::Answer { target, answer } => {
                self.relay(RelayKind::Answer, peer_id, target, answer).await;
            }
            ClientSignal::IceCandidate { target, candidate } => {
                self.relay(RelayKind::IceCandidate, peer_id, target, candidate)
                    .await;
            }
        }
    }

    pub async fn join(&self, peer_id: PeerId, raw_room_id: &str) {
        let Some(room_id) = RoomId::parse(raw_room_id) else {
            warn!("Peer {} sent a blank room id", peer_id);
            self.signaling
                .send_signal(
                    peer_id,
                    ServerSignal::Error {
                        code: ErrorCode::InvalidRoom,
                        message: "room id must not be empty".to_owned(),
                    },
                )
                .await;
            return;
        };

        self.join_room(peer_id, room_id).await;
    }

    /// Joins a freshly generated room and returns its id.
    pub async fn create_room(&self, peer_id: PeerId) -> RoomId {
        let mut room_id = RoomId::generate();
        while self.registry.contains_room(&room_id) {
            room_id = RoomId::generate();
        }
        info!("Creating room {} for {}", room_id, peer_id);

        self.join_room(peer_id, room_id.clone()).await;
        room_id
    }

    async fn join_room(&self, peer_id: PeerId, room_id: RoomId) {
        match self.registry.join(peer_id, room_id) {
            JoinOutcome::Joined {
                room_id,
                notify,
                left,
            } => {
                if let Some(left) = left {
                    self.announce_leave(peer_id, left).await;
                }
                info!(
                    "Peer {} joined room {} ({} already present)",
                    peer_id,
                    room_id,
                    notify.len()
                );

                self.signaling
                    .send_signal(peer_id, ServerSignal::Joined { room_id })
                    .await;
                for member in notify {
                    self.signaling
                        .send_signal(member, ServerSignal::PeerJoined { peer_id })
                        .await;
                }
            }
            JoinOutcome::AlreadyMember { room_id } => {
                debug!("Peer {} re-joined room {}", peer_id, room_id);
                self.signaling
                    .send_signal(peer_id, ServerSignal::Joined { room_id })
                    .await;
            }
            JoinOutcome::RoomFull { room_id, left } => {
                if let Some(left) = left {
                    self.announce_leave(peer_id, left).await;
                }
                warn!("Peer {} refused: room {} is full", peer_id, room_id);
                self.signaling
                    .send_signal(
                        peer_id,
                        ServerSignal::Error {
                            code: ErrorCode::RoomFull,
                            message: format!("room {} is full", room_id),
                        },
                    )
                    .await;
            }
        }
    }

    pub async fn relay(
        &self,
        kind: RelayKind,
        sender: PeerId,
        target: PeerId,
        payload: SignalPayload,
    ) -> RelayOutcome {
        if !self.registry.is_member(&target) {
            debug!("Dropping {:?} from {}: no such target {}", kind, sender, target);
            return RelayOutcome::RoutingMiss;
        }

        debug!("Relaying {:?} {} -> {}", kind, sender, target);
        self.signaling
            .send_signal(target, kind.into_signal(payload, sender))
            .await;
        RelayOutcome::Delivered
    }

    pub async fn disconnect(&self, peer_id: PeerId) {
        let Some(left) = self.registry.leave(&peer_id) else {
            return;
        };
        self.announce_leave(peer_id, left).await;
    }

    async fn announce_leave(&self, peer_id: PeerId, left: LeaveOutcome) {
        if left.remaining.is_empty() {
            info!("Peer {} left room {}; room closed", peer_id, left.room_id);
            return;
        }

        info!("Peer {} left room {}", peer_id, left.room_id);
        for member in left.remaining {
            self.signaling
                .send_signal(member, ServerSignal::PeerLeft { peer_id })
                .await;
        }
    }
}
