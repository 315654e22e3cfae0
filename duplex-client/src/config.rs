use crate::media::MediaConstraints;
use duplex_core::IceServerConfig;

/// Upper bound on candidates held back while no peer connection exists.
pub const MAX_PENDING_CANDIDATES: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    /// Overrides the servers announced by the hub. When neither is present
    /// the public STUN defaults are used.
    pub ice_servers: Option<Vec<IceServerConfig>>,
    pub media: MediaConstraints,
    /// Hold remote candidates that arrive before the peer connection exists
    /// and apply them once it does. Off by default: such candidates are
    /// dropped.
    pub buffer_early_candidates: bool,
}
