use crate::controller::CallState;
use crate::media::MediaStream;
use crate::transport::{PeerTransport, RemoteTrack, SenderId};
use duplex_core::PeerId;

/// Call state together with the resources each state owns. A peer
/// connection only exists inside `Negotiating` and `Connected`.
pub(super) enum Session {
    Idle {
        remote: Option<PeerId>,
    },
    MediaAcquired {
        local: MediaStream,
        remote: Option<PeerId>,
    },
    Negotiating(Call),
    Connected(Call),
    Ended,
}

pub(super) struct Call {
    pub local: MediaStream,
    pub link: PeerLink,
}

pub(super) struct PeerLink {
    pub remote: PeerId,
    pub transport: Box<dyn PeerTransport>,
    pub generation: u64,
    pub video_sender: Option<SenderId>,
    pub remote_tracks: Vec<RemoteTrack>,
    /// Our offer is out and no answer has been applied yet.
    pub awaiting_answer: bool,
}

impl Session {
    pub fn state(&self) -> CallState {
        match self {
            Session::Idle { .. } => CallState::Idle,
            Session::MediaAcquired { .. } => CallState::MediaAcquired,
            Session::Negotiating(_) => CallState::Negotiating,
            Session::Connected(_) => CallState::Connected,
            Session::Ended => CallState::Ended,
        }
    }

    pub fn remote(&self) -> Option<PeerId> {
        match self {
            Session::Idle { remote } | Session::MediaAcquired { remote, .. } => *remote,
            Session::Negotiating(call) | Session::Connected(call) => Some(call.link.remote),
            Session::Ended => None,
        }
    }

    pub fn local(&self) -> Option<&MediaStream> {
        match self {
            Session::MediaAcquired { local, .. } => Some(local),
            Session::Negotiating(call) | Session::Connected(call) => Some(&call.local),
            _ => None,
        }
    }

    pub fn call(&self) -> Option<&Call> {
        match self {
            Session::Negotiating(call) | Session::Connected(call) => Some(call),
            _ => None,
        }
    }

    pub fn call_mut(&mut self) -> Option<&mut Call> {
        match self {
            Session::Negotiating(call) | Session::Connected(call) => Some(call),
            _ => None,
        }
    }
}
