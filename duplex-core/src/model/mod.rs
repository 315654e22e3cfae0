mod peer;
mod room;
mod session;
mod signaling;

pub use peer::PeerId;
pub use room::RoomId;
pub use session::{IceCandidate, SdpType, SessionDescription};
pub use signaling::{ClientSignal, ErrorCode, IceServerConfig, ServerSignal, SignalPayload};
