use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{ROOM_CODE_ALPHABET, ROOM_CODE_LEN};

/// Caller-chosen or generated room key. Never empty.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Trims the input and rejects blank ids.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// Short uppercase code, e.g. `K3Q9ZD`.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..ROOM_CODE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..ROOM_CODE_ALPHABET.len());
                ROOM_CODE_ALPHABET[idx] as char
            })
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
