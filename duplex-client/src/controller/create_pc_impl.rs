use duplex_core::PeerId;
use tracing::{debug, warn};

use crate::controller::session::{Call, PeerLink, Session};
use crate::controller::{NegotiationController, Notice};
use crate::error::ClientError;
use crate::media::{MediaStream, TrackKind};
use crate::transport::TransportNotifier;

impl NegotiationController {
    /// MediaAcquired with a known remote → Negotiating with a fresh peer
    /// connection. On failure the session is left as it was.
    pub(super) async fn open_link(&mut self) -> bool {
        let (local, remote) = match std::mem::replace(&mut self.session, Session::Ended) {
            Session::MediaAcquired {
                local,
                remote: Some(remote),
            } => (local, remote),
            other => {
                self.session = other;
                return false;
            }
        };

        match self.create_link(remote, &local).await {
            Ok(link) => {
                self.session = Session::Negotiating(Call { local, link });
                true
            }
            Err(e) => {
                self.session = Session::MediaAcquired {
                    local,
                    remote: Some(remote),
                };
                self.negotiation_failed(e);
                false
            }
        }
    }

    async fn create_link(
        &mut self,
        remote: PeerId,
        local: &MediaStream,
    ) -> Result<PeerLink, ClientError> {
        self.generation += 1;
        let generation = self.generation;
        let notifier = TransportNotifier::new(generation, self.queue.tx.clone());
        let transport = self.transports.create(&self.ice_servers(), notifier).await?;

        // An active screen share takes the camera's place from the start.
        let screen_track = self.screen.as_ref().and_then(|s| s.first_video()).cloned();

        let mut video_sender = None;
        for track in local.tracks() {
            let outgoing = match (track.kind(), &screen_track) {
                (TrackKind::Video, Some(screen)) => screen.clone(),
                _ => track.clone(),
            };
            let sender = match transport.add_track(outgoing).await {
                Ok(sender) => sender,
                Err(e) => {
                    let _ = transport.close().await;
                    return Err(e);
                }
            };
            if track.kind() == TrackKind::Video && video_sender.is_none() {
                video_sender = Some(sender);
            }
        }

        debug!(%remote, generation, "peer connection created");
        Ok(PeerLink {
            remote,
            transport,
            generation,
            video_sender,
            remote_tracks: Vec::new(),
            awaiting_answer: false,
        })
    }

    /// Closes the peer connection and falls back to MediaAcquired, keeping
    /// local media and the remote.
    pub(super) async fn discard_link(&mut self) {
        match std::mem::replace(&mut self.session, Session::Ended) {
            Session::Negotiating(call) | Session::Connected(call) => {
                if let Err(e) = call.link.transport.close().await {
                    warn!("error closing peer connection: {}", e);
                }
                self.session = Session::MediaAcquired {
                    local: call.local,
                    remote: Some(call.link.remote),
                };
            }
            other => self.session = other,
        }
    }

    pub(super) fn negotiation_failed(&self, e: ClientError) {
        warn!("{}", e);
        self.notify(Notice::NegotiationFailed(e.to_string()));
    }
}
