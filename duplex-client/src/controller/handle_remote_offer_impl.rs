use duplex_core::{ClientSignal, PeerId, SdpType, SessionDescription, SignalPayload};
use tracing::{info, warn};

use crate::controller::session::Session;
use crate::controller::{NegotiationController, Notice};
use crate::error::ClientError;

impl NegotiationController {
    pub(super) async fn handle_remote_offer(&mut self, offer: SignalPayload, sender: PeerId) {
        if self.local_id == Some(sender) {
            return;
        }
        let desc = match SessionDescription::from_payload(offer) {
            Ok(desc) if desc.sdp_type == SdpType::Offer => desc,
            _ => {
                warn!(%sender, "malformed offer");
                self.notify(Notice::NegotiationFailed("malformed offer".into()));
                return;
            }
        };

        if let Some(call) = self.session.call() {
            if call.link.remote != sender {
                warn!(%sender, "offer from a third peer while in a call");
                return;
            }
            if call.link.awaiting_answer {
                if self.keeps_own_offer(sender) {
                    info!(%sender, "offer collision, keeping ours");
                    return;
                }
                info!(%sender, "offer collision, answering theirs");
                self.discard_link().await;
            }
        }

        self.notify(Notice::IncomingCall(sender));

        if matches!(self.session, Session::Idle { .. } | Session::Ended) {
            match self.capture.acquire_local_media(self.config.media).await {
                Ok(local) => {
                    self.session = Session::MediaAcquired {
                        local,
                        remote: Some(sender),
                    };
                    self.notify(Notice::CallStarted);
                }
                Err(e) => {
                    warn!("{}", e);
                    self.session = Session::Idle {
                        remote: Some(sender),
                    };
                    self.notify(Notice::MediaAccessDenied(e.to_string()));
                    return;
                }
            }
        }

        let fresh = match &mut self.session {
            Session::MediaAcquired { remote, .. } => {
                *remote = Some(sender);
                true
            }
            _ => false,
        };
        if fresh && !self.open_link().await {
            return;
        }

        if let Err(e) = self.answer_offer(desc).await {
            self.negotiation_failed(e);
            if fresh {
                self.discard_link().await;
            }
        }
    }

    /// The peer with the lower id keeps its offer when both sides dial at
    /// once. Without an id of our own we always yield.
    fn keeps_own_offer(&self, other: PeerId) -> bool {
        self.local_id.is_some_and(|me| me < other)
    }

    async fn answer_offer(&mut self, desc: SessionDescription) -> Result<(), ClientError> {
        let Some(call) = self.session.call_mut() else {
            return Ok(());
        };
        let remote = call.link.remote;

        call.link.transport.set_remote_description(desc).await?;
        self.flush_pending_candidates().await;

        let Some(call) = self.session.call_mut() else {
            return Ok(());
        };
        let answer = call.link.transport.create_answer().await?;
        call.link
            .transport
            .set_local_description(answer.clone())
            .await?;
        let payload = answer.to_payload()?;

        info!(%remote, "sending answer");
        self.send_signal(ClientSignal::Answer {
            target: remote,
            answer: payload,
        });
        self.notify(Notice::AnswerSent(remote));
        Ok(())
    }
}
