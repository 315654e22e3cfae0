use thiserror::Error;

/// Failures the controller turns into user-visible notices. None of them is
/// fatal and none is retried automatically.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("camera/microphone unavailable: {0}")]
    MediaAccess(String),

    #[error("screen capture unavailable: {0}")]
    DisplayAccess(String),

    #[error("signaling hub unreachable: {0}")]
    SignalingUnavailable(String),

    #[error("negotiation failed: {0}")]
    NegotiationFailure(String),

    #[error("peer transport error: {0}")]
    Transport(String),
}

impl From<webrtc::Error> for ClientError {
    fn from(e: webrtc::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::NegotiationFailure(e.to_string())
    }
}
