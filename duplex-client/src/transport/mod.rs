mod rtc_transport;

pub use rtc_transport::*;

use crate::controller::ControllerEvent;
use crate::error::ClientError;
use crate::media::{SharedTrack, TrackKind};
use async_trait::async_trait;
use duplex_core::{IceCandidate, IceServerConfig, SessionDescription};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Handle for an outgoing track slot, returned by [`PeerTransport::add_track`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SenderId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTrack {
    pub id: String,
    pub kind: TrackKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    LocalCandidate(IceCandidate),
    RemoteTrack(RemoteTrack),
    StateChanged(ConnectionState),
}

/// Feeds transport callbacks into the controller queue, tagged with the
/// generation of the peer connection that produced them.
#[derive(Debug, Clone)]
pub struct TransportNotifier {
    generation: u64,
    events: mpsc::UnboundedSender<ControllerEvent>,
}

impl TransportNotifier {
    pub(crate) fn new(generation: u64, events: mpsc::UnboundedSender<ControllerEvent>) -> Self {
        Self { generation, events }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn notify(&self, event: TransportEvent) {
        let _ = self.events.send(ControllerEvent::Transport {
            generation: self.generation,
            event,
        });
    }
}

/// One peer connection. Implementations report asynchronous happenings
/// through the [`TransportNotifier`] they were created with.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn add_track(&self, track: SharedTrack) -> Result<SenderId, ClientError>;
    async fn replace_track(&self, sender: SenderId, track: SharedTrack) -> Result<(), ClientError>;

    async fn create_offer(&self) -> Result<SessionDescription, ClientError>;
    async fn create_answer(&self) -> Result<SessionDescription, ClientError>;
    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), ClientError>;
    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), ClientError>;
    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), ClientError>;

    async fn close(&self) -> Result<(), ClientError>;
}

#[async_trait]
pub trait PeerTransportFactory: Send + Sync {
    async fn create(
        &self,
        ice_servers: &[IceServerConfig],
        notifier: TransportNotifier,
    ) -> Result<Box<dyn PeerTransport>, ClientError>;
}
