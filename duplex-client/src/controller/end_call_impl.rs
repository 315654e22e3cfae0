use tracing::{info, warn};

use crate::controller::session::Session;
use crate::controller::{NegotiationController, Notice};

impl NegotiationController {
    /// Stops every local track (camera and screen), closes the peer
    /// connection and forgets the remote. Valid from any state.
    pub(super) async fn end_call(&mut self) {
        match std::mem::replace(&mut self.session, Session::Ended) {
            Session::Idle { .. } | Session::Ended => {}
            Session::MediaAcquired { local, .. } => local.stop_all(),
            Session::Negotiating(call) | Session::Connected(call) => {
                call.local.stop_all();
                if let Err(e) = call.link.transport.close().await {
                    warn!("error closing peer connection: {}", e);
                }
            }
        }

        if let Some(screen) = self.screen.take() {
            screen.stop_all();
        }
        self.pending_candidates.clear();

        info!("call ended");
        self.notify(Notice::CallEnded);
    }
}
