//! UseCase: leaving a room
//!
//! Shared by explicit `leave` messages, connection close/error and the
//! periodic sweep. Effects, in order:
//!
//! 1. remove the session from the room (the socket itself stays open)
//! 2. broadcast `participant-left` to the remaining members
//! 3. if the room lost its last moderator, promote the earliest joiner and
//!    broadcast `moderator-changed`
//! 4. if the room is now empty, remove it from the registry

use std::sync::Arc;

use tracing::info;

use crate::domain::{ParticipantId, RoomCode, RoomEvent, RoomNotifier, RoomRegistry, RoomRepository};

use super::session::SessionContext;

/// What a departure changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub participant_id: ParticipantId,
    pub room_code: RoomCode,
    /// Participant promoted to moderator as a consequence
    pub promoted: Option<ParticipantId>,
    pub room_removed: bool,
}

/// 退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    notifier: Arc<dyn RoomNotifier>,
}

impl LeaveRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, notifier: Arc<dyn RoomNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Remove the session's participant from its room.
    ///
    /// Returns `None` if the participant was already gone, which makes
    /// repeated cleanup for the same session harmless.
    pub async fn execute(&self, session: &SessionContext) -> Option<Departure> {
        let mut registry = self.repository.lock().await;
        depart(
            &mut registry,
            self.notifier.as_ref(),
            &session.room_code,
            &session.participant_id,
        )
    }
}

/// Apply the full cleanup for one participant.
///
/// Closing the transport is left to the caller.
pub(crate) fn depart(
    registry: &mut RoomRegistry,
    notifier: &dyn RoomNotifier,
    room_code: &RoomCode,
    participant_id: &ParticipantId,
) -> Option<Departure> {
    let room = registry.get_mut(room_code)?;
    let departed = room.remove_participant(participant_id)?;
    info!(
        "Participant '{}' left room '{}' ({} remaining)",
        participant_id,
        room_code,
        room.len()
    );

    if room.is_empty() {
        registry.remove(room_code);
        info!("Room '{}' removed (empty)", room_code);
        return Some(Departure {
            participant_id: participant_id.clone(),
            room_code: room_code.clone(),
            promoted: None,
            room_removed: true,
        });
    }

    notifier.broadcast(room, &RoomEvent::ParticipantLeft(participant_id.clone()), None);

    let promoted = if departed.is_moderator {
        room.promote_successor()
    } else {
        None
    };
    if let Some(successor) = &promoted {
        info!(
            "Participant '{}' promoted to moderator of room '{}'",
            successor, room_code
        );
        notifier.broadcast(room, &RoomEvent::ModeratorChanged(successor.clone()), None);
    }

    Some(Departure {
        participant_id: participant_id.clone(),
        room_code: room_code.clone(),
        promoted,
        room_removed: false,
    })
}
