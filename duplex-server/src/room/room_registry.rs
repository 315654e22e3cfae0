use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use duplex_core::{PeerId, RoomId};
use std::collections::HashSet;

/// Result of adding a connection to a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The connection is now a member. `notify` lists the members that were
    /// already there; `left` is set when the connection had to leave another
    /// room first.
    Joined {
        room_id: RoomId,
        notify: Vec<PeerId>,
        left: Option<LeaveOutcome>,
    },
    /// The connection was already a member of this room. Nothing changed.
    AlreadyMember { room_id: RoomId },
    /// The room is at capacity. The connection is not a member of it; `left`
    /// is set when it gave up a previous room on the way.
    RoomFull {
        room_id: RoomId,
        left: Option<LeaveOutcome>,
    },
}

/// Result of removing a connection from its room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    /// Members still in the room. Empty when the room was deleted.
    pub remaining: Vec<PeerId>,
}

/// Room membership table.
///
/// Every mutation of a room's member set happens under that room's map entry,
/// so concurrent joins and leaves on one room are serialized while different
/// rooms proceed independently. An empty room is removed in the same critical
/// section that emptied it.
pub struct RoomRegistry {
    rooms: DashMap<RoomId, HashSet<PeerId>>,
    memberships: DashMap<PeerId, RoomId>,
    capacity: usize,
}

impl RoomRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            memberships: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn join(&self, peer_id: PeerId, room_id: RoomId) -> JoinOutcome {
        let mut left = None;
        if let Some(current) = self.room_of(&peer_id) {
            if current == room_id {
                return JoinOutcome::AlreadyMember { room_id };
            }
            left = self.leave(&peer_id);
        }

        let notify = match self.rooms.entry(room_id.clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().len() >= self.capacity {
                    return JoinOutcome::RoomFull { room_id, left };
                }
                let existing: Vec<PeerId> = entry.get().iter().copied().collect();
                entry.get_mut().insert(peer_id);
                existing
            }
            Entry::Vacant(entry) => {
                entry.insert(HashSet::from([peer_id]));
                Vec::new()
            }
        };

        self.memberships.insert(peer_id, room_id.clone());

        JoinOutcome::Joined {
            room_id,
            notify,
            left,
        }
    }

    /// Removes the connection from its room. Returns `None` when it was not in
    /// one, which makes repeated calls harmless.
    pub fn leave(&self, peer_id: &PeerId) -> Option<LeaveOutcome> {
        let (_, room_id) = self.memberships.remove(peer_id)?;

        let remaining = match self.rooms.entry(room_id.clone()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().remove(peer_id);
                if entry.get().is_empty() {
                    entry.remove();
                    Vec::new()
                } else {
                    entry.get().iter().copied().collect()
                }
            }
            Entry::Vacant(_) => Vec::new(),
        };

        Some(LeaveOutcome { room_id, remaining })
    }

    pub fn room_of(&self, peer_id: &PeerId) -> Option<RoomId> {
        self.memberships.get(peer_id).map(|r| r.value().clone())
    }

    pub fn is_member(&self, peer_id: &PeerId) -> bool {
        self.memberships.contains_key(peer_id)
    }

    pub fn members(&self, room_id: &RoomId) -> Vec<PeerId> {
        self.rooms
            .get(room_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
