use async_trait::async_trait;
use duplex_core::{PeerId, ServerSignal};

/// Delivery side of the hub. Implemented by the WebSocket layer so rooms can
/// push frames to individual connections without knowing how they are wired.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Best-effort delivery. A missing or dead connection is logged and
    /// swallowed, never reported to the caller.
    async fn send_signal(&self, peer_id: PeerId, msg: ServerSignal);
}
