use serde::{Deserialize, Serialize};

use crate::model::signaling::SignalPayload;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Answer,
    Pranswer,
    Rollback,
}

/// Session description in the shape browsers put on the wire
/// (`{"type": "offer", "sdp": "..."}`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: SdpType,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Answer,
            sdp: sdp.into(),
        }
    }

    pub fn to_payload(&self) -> serde_json::Result<SignalPayload> {
        serde_json::to_value(self)
    }

    pub fn from_payload(payload: SignalPayload) -> serde_json::Result<Self> {
        serde_json::from_value(payload)
    }
}

/// Trickle ICE candidate, `RTCIceCandidateInit` layout.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default)]
    pub sdp_mid: Option<String>,
    #[serde(default)]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

impl IceCandidate {
    pub fn to_payload(&self) -> serde_json::Result<SignalPayload> {
        serde_json::to_value(self)
    }

    pub fn from_payload(payload: SignalPayload) -> serde_json::Result<Self> {
        serde_json::from_value(payload)
    }
}
