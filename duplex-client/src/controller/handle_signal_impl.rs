use duplex_core::{IceCandidate, PeerId, SdpType, ServerSignal, SessionDescription, SignalPayload};
use tracing::{debug, info, warn};

use crate::config::MAX_PENDING_CANDIDATES;
use crate::controller::session::Session;
use crate::controller::{NegotiationController, Notice};

impl NegotiationController {
    pub(super) async fn handle_signal(&mut self, signal: ServerSignal) {
        match signal {
            ServerSignal::Welcome {
                peer_id,
                ice_servers,
            } => {
                info!(%peer_id, "hub assigned our id ({} ice servers)", ice_servers.len());
                self.local_id = Some(peer_id);
                self.hub_ice_servers = Some(ice_servers);
                self.notify(Notice::SignalingConnected { local_id: peer_id });
            }

            ServerSignal::Joined { room_id } => {
                info!(%room_id, "joined room");
                self.room = Some(room_id.clone());
                self.notify(Notice::RoomJoined(room_id));
            }

            ServerSignal::Error { code, message } => {
                warn!("hub rejected request: {:?} {}", code, message);
                self.notify(Notice::HubError { code, message });
            }

            ServerSignal::PeerJoined { peer_id } => self.on_peer_joined(peer_id).await,
            ServerSignal::PeerLeft { peer_id } => self.on_peer_left(peer_id).await,

            ServerSignal::Offer { offer, sender } => self.handle_remote_offer(offer, sender).await,
            ServerSignal::Answer { answer, sender } => self.on_remote_answer(answer, sender).await,
            ServerSignal::IceCandidate { candidate, sender } => {
                self.on_remote_candidate(candidate, sender).await
            }
        }
    }

    async fn on_peer_joined(&mut self, peer_id: PeerId) {
        if self.local_id == Some(peer_id) {
            return;
        }

        match &mut self.session {
            Session::Idle { remote } => {
                if remote.is_some_and(|r| r != peer_id) {
                    warn!(%peer_id, "already paired, ignoring newcomer");
                    return;
                }
                *remote = Some(peer_id);
            }
            Session::Ended => {
                self.session = Session::Idle {
                    remote: Some(peer_id),
                };
            }
            Session::MediaAcquired { remote, .. } => {
                *remote = Some(peer_id);
                self.notify(Notice::PeerJoined(peer_id));
                self.start_offer().await;
                return;
            }
            Session::Negotiating(call) | Session::Connected(call) => {
                if call.link.remote == peer_id {
                    debug!(%peer_id, "duplicate peer-joined");
                } else {
                    warn!(%peer_id, "call in progress, ignoring newcomer");
                }
                return;
            }
        }

        // The newcomer is never told about us, so we place the call.
        self.notify(Notice::PeerJoined(peer_id));
        self.start_call().await;
    }

    async fn on_peer_left(&mut self, peer_id: PeerId) {
        self.pending_candidates.retain(|(sender, _)| *sender != peer_id);

        if self.session.remote() != Some(peer_id) {
            debug!(%peer_id, "peer-left for a peer we are not paired with");
            return;
        }

        info!(%peer_id, "remote peer left");
        self.notify(Notice::PeerLeft(peer_id));

        if let Session::Idle { remote } = &mut self.session {
            *remote = None;
            return;
        }
        self.end_call().await;
    }

    async fn on_remote_answer(&mut self, answer: SignalPayload, sender: PeerId) {
        let desc = match SessionDescription::from_payload(answer) {
            Ok(desc) if desc.sdp_type == SdpType::Answer => desc,
            _ => {
                warn!(%sender, "malformed answer");
                self.notify(Notice::NegotiationFailed("malformed answer".into()));
                return;
            }
        };

        let Some(call) = self.session.call_mut() else {
            debug!(%sender, "answer without a peer connection");
            return;
        };
        if call.link.remote != sender {
            warn!(%sender, "answer from a peer we are not calling");
            return;
        }
        if !call.link.awaiting_answer {
            warn!(%sender, "unexpected answer, no offer outstanding");
            return;
        }

        let applied = call.link.transport.set_remote_description(desc).await;
        if let Err(e) = applied {
            warn!("failed to apply answer: {}", e);
            self.notify(Notice::NegotiationFailed(e.to_string()));
            return;
        }
        call.link.awaiting_answer = false;

        self.flush_pending_candidates().await;
        self.notify(Notice::CallAccepted);
        self.mark_connected();
    }

    async fn on_remote_candidate(&mut self, candidate: SignalPayload, sender: PeerId) {
        let candidate = match IceCandidate::from_payload(candidate) {
            Ok(c) => c,
            Err(e) => {
                warn!(%sender, "malformed ice candidate: {}", e);
                return;
            }
        };

        match self.session.call_mut() {
            Some(call) if call.link.remote == sender => {
                if let Err(e) = call.link.transport.add_ice_candidate(candidate).await {
                    warn!("failed to add ice candidate: {}", e);
                }
            }
            Some(_) => debug!(%sender, "candidate from a peer we are not calling"),
            None if self.config.buffer_early_candidates => {
                if self.pending_candidates.len() >= MAX_PENDING_CANDIDATES {
                    warn!(%sender, "candidate buffer full, dropping");
                    return;
                }
                debug!(%sender, "holding candidate until a peer connection exists");
                self.pending_candidates.push((sender, candidate));
            }
            None => debug!(%sender, "dropping candidate, no peer connection yet"),
        }
    }

    /// Applies held candidates from the current remote. Candidates from
    /// anyone else are discarded.
    pub(super) async fn flush_pending_candidates(&mut self) {
        if self.pending_candidates.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_candidates);
        let Some(call) = self.session.call_mut() else {
            return;
        };

        for (sender, candidate) in pending {
            if sender != call.link.remote {
                continue;
            }
            if let Err(e) = call.link.transport.add_ice_candidate(candidate).await {
                warn!("failed to add held ice candidate: {}", e);
            }
        }
    }

    /// Negotiating → Connected. Reports the first transition only.
    pub(super) fn mark_connected(&mut self) {
        if !matches!(self.session, Session::Negotiating(_)) {
            return;
        }
        if let Session::Negotiating(call) = std::mem::replace(&mut self.session, Session::Ended) {
            info!(remote = %call.link.remote, "call connected");
            self.session = Session::Connected(call);
            self.notify(Notice::PeerConnected);
        }
    }
}
