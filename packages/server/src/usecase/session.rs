//! Per-connection room binding.

use crate::domain::{ParticipantId, Room, RoomCode, RoomRegistry};

use super::error::SessionError;

/// Identity a connection acquires by joining a room.
///
/// Created once at join time and held by the connection handler until the
/// session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub participant_id: ParticipantId,
    pub room_code: RoomCode,
}

impl SessionContext {
    pub fn new(participant_id: ParticipantId, room_code: RoomCode) -> Self {
        Self {
            participant_id,
            room_code,
        }
    }
}

/// Resolve the sender's room, checking the sender is still a member.
///
/// A session reaped by the sweep keeps its context on the connection side,
/// so membership is re-checked on every message.
pub(crate) fn sender_room<'a>(
    registry: &'a mut RoomRegistry,
    session: &SessionContext,
) -> Result<&'a mut Room, SessionError> {
    let room = registry
        .get_mut(&session.room_code)
        .ok_or(SessionError::NotJoined)?;
    if room.participant(&session.participant_id).is_none() {
        return Err(SessionError::NotJoined);
    }
    Ok(room)
}
