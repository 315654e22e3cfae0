mod ws_signaling;

pub use ws_signaling::*;

use crate::error::ClientError;
use duplex_core::ClientSignal;

/// Outgoing half of the hub connection.
pub trait SignalSink: Send + Sync {
    fn send(&self, signal: ClientSignal) -> Result<(), ClientError>;
}
