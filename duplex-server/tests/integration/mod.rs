//! Integration tests for duplex-server.
//!
//! Tests are organized by functionality:
//! - `connection_tests` - joining, leaving and disconnect cleanup
//! - `messaging_tests` - directed offer/answer/candidate relay
//! - `multi_peer_tests` - two-party sessions and room capacity
//! - `ws_tests` - the same flows over a real WebSocket


use std::sync::Arc;
use tracing::Level;

use duplex_server::RoomManager;

use crate::utils::MockSignalingOutput;

/// Initialize tracing for tests (call once per test).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Create a hub with a recording signaling output.
pub fn create_test_hub(capacity: usize) -> (RoomManager, MockSignalingOutput) {
    let signaling = MockSignalingOutput::new();
    let hub = RoomManager::new(capacity, Arc::new(signaling.clone()));
    (hub, signaling)
}
