use duplex_core::ClientSignal;
use tracing::{debug, warn};

use crate::controller::{NegotiationController, Notice};
use crate::transport::{ConnectionState, TransportEvent};

impl NegotiationController {
    pub(super) fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::LocalCandidate(candidate) => {
                let Some(remote) = self.session.remote() else {
                    debug!("no remote to send candidate to");
                    return;
                };
                match candidate.to_payload() {
                    Ok(payload) => self.send_signal(ClientSignal::IceCandidate {
                        target: remote,
                        candidate: payload,
                    }),
                    Err(e) => warn!("failed to encode candidate: {}", e),
                }
            }

            TransportEvent::RemoteTrack(track) => {
                let kind = track.kind;
                if let Some(call) = self.session.call_mut()
                    && !call.link.remote_tracks.iter().any(|t| t.id == track.id)
                {
                    call.link.remote_tracks.push(track);
                }
                self.notify(Notice::RemoteTrack(kind));
                self.mark_connected();
            }

            TransportEvent::StateChanged(state) => match state {
                ConnectionState::Connected => self.mark_connected(),
                ConnectionState::Disconnected | ConnectionState::Failed => {
                    warn!("peer connection {:?}", state);
                    self.notify(Notice::ConnectionProblem(state));
                }
                ConnectionState::Closed => self.notify(Notice::ConnectionClosed),
                ConnectionState::New | ConnectionState::Connecting => {
                    debug!("peer connection {:?}", state)
                }
            },
        }
    }
}
