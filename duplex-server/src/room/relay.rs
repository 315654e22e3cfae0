use duplex_core::{PeerId, ServerSignal, SignalPayload};

/// Directed negotiation frames the hub forwards between two connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayKind {
    Offer,
    Answer,
    IceCandidate,
}

impl RelayKind {
    /// Wraps the payload for delivery, stamping the sender.
    pub fn into_signal(self, payload: SignalPayload, sender: PeerId) -> ServerSignal {
        match self {
            RelayKind::Offer => ServerSignal::Offer {
                offer: payload,
                sender,
            },
            RelayKind::Answer => ServerSignal::Answer {
                answer: payload,
                sender,
            },
            RelayKind::IceCandidate => ServerSignal::IceCandidate {
                candidate: payload,
                sender,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Delivered,
    /// Target is not a member of any room. The frame is dropped.
    RoutingMiss,
}
