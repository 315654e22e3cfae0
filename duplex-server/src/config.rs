use duplex_core::IceServerConfig;
use duplex_core::utils::{DEFAULT_ROOM_CAPACITY, default_ice_servers};
use std::net::SocketAddr;

/// Hub settings. The CLI fills this from flags and environment.
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub bind_addr: SocketAddr,
    /// Maximum members per room.
    pub room_capacity: usize,
    /// Handed to every client in its `welcome` frame.
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            room_capacity: DEFAULT_ROOM_CAPACITY,
            ice_servers: default_ice_servers(),
        }
    }
}
