use crate::media::TrackKind;
use crate::transport::ConnectionState;
use duplex_core::{ErrorCode, PeerId, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    MediaAcquired,
    Negotiating,
    Connected,
    Ended,
}

/// Status updates for whatever presents the call to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SignalingConnected { local_id: PeerId },
    SignalingUnavailable(String),
    RoomJoined(RoomId),
    InvalidRoom,
    HubError { code: ErrorCode, message: String },

    PeerJoined(PeerId),
    PeerLeft(PeerId),

    CallStarted,
    MediaAccessDenied(String),
    OfferSent(PeerId),
    IncomingCall(PeerId),
    AnswerSent(PeerId),
    CallAccepted,
    PeerConnected,
    RemoteTrack(TrackKind),
    ConnectionProblem(ConnectionState),
    ConnectionClosed,
    NegotiationFailed(String),
    CallEnded,

    ScreenShareStarted,
    ScreenShareEnded,
    ScreenShareFailed(String),
    AudioToggled { enabled: bool },
    VideoToggled { enabled: bool },
}
