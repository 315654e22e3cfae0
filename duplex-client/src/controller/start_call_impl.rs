use duplex_core::ClientSignal;
use tracing::{debug, info, warn};

use crate::controller::session::Session;
use crate::controller::{NegotiationController, Notice};
use crate::error::ClientError;

impl NegotiationController {
    pub(super) async fn start_call(&mut self) {
        let remote = match &self.session {
            Session::Idle { remote } => *remote,
            Session::Ended => None,
            Session::MediaAcquired {
                remote: Some(_), ..
            } => {
                // Media is there but the earlier attempt to dial failed.
                self.start_offer().await;
                return;
            }
            _ => {
                debug!("call already started");
                return;
            }
        };

        match self.capture.acquire_local_media(self.config.media).await {
            Ok(local) => {
                info!("local media acquired ({} tracks)", local.tracks().len());
                self.session = Session::MediaAcquired { local, remote };
                self.notify(Notice::CallStarted);
                if remote.is_some() {
                    self.start_offer().await;
                }
            }
            Err(e) => {
                warn!("{}", e);
                self.session = Session::Idle { remote };
                self.notify(Notice::MediaAccessDenied(e.to_string()));
            }
        }
    }

    pub(super) async fn start_offer(&mut self) {
        if !self.open_link().await {
            return;
        }
        if let Err(e) = self.send_offer().await {
            self.negotiation_failed(e);
            self.discard_link().await;
        }
    }

    async fn send_offer(&mut self) -> Result<(), ClientError> {
        let Some(call) = self.session.call_mut() else {
            return Ok(());
        };
        let remote = call.link.remote;

        let offer = call.link.transport.create_offer().await?;
        call.link
            .transport
            .set_local_description(offer.clone())
            .await?;
        let payload = offer.to_payload()?;
        call.link.awaiting_answer = true;

        info!(%remote, "sending offer");
        self.send_signal(ClientSignal::Offer {
            target: remote,
            offer: payload,
        });
        self.notify(Notice::OfferSent(remote));
        Ok(())
    }
}
