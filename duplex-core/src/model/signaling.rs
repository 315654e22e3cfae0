use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

/// Offer, answer and candidate bodies. The hub forwards them untouched.
pub type SignalPayload = serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
}

/// Frames a participant sends to the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ClientSignal {
    #[serde(rename_all = "camelCase")]
    Join { room_id: String },
    CreateRoom,
    Offer {
        target: PeerId,
        offer: SignalPayload,
    },
    Answer {
        target: PeerId,
        answer: SignalPayload,
    },
    IceCandidate {
        target: PeerId,
        candidate: SignalPayload,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    InvalidRoom,
    RoomFull,
}

/// Frames the hub sends to a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerSignal {
    #[serde(rename_all = "camelCase")]
    Welcome {
        peer_id: PeerId,
        ice_servers: Vec<IceServerConfig>,
    },
    #[serde(rename_all = "camelCase")]
    Joined { room_id: RoomId },
    Error { code: ErrorCode, message: String },
    #[serde(rename_all = "camelCase")]
    PeerJoined { peer_id: PeerId },
    #[serde(rename_all = "camelCase")]
    PeerLeft { peer_id: PeerId },
    Offer {
        offer: SignalPayload,
        sender: PeerId,
    },
    Answer {
        answer: SignalPayload,
        sender: PeerId,
    },
    IceCandidate {
        candidate: SignalPayload,
        sender: PeerId,
    },
}
