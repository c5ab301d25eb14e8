//! UseCase: joining a room
//!
//! Looks up or lazily creates the room, admits the new participant, replies
//! to the joiner with the current room state and chat history, and announces
//! the newcomer to everyone else.

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    MediaState, Participant, ParticipantConnection, ParticipantIdFactory, ParticipantName,
    ParticipantSnapshot, RoomCode, RoomError, RoomEvent, RoomNotifier, RoomRepository, Timestamp,
};

use super::{error::JoinError, session::SessionContext};

/// Everything needed to admit one participant.
pub struct JoinRoomCommand {
    pub room_code: RoomCode,
    pub name: ParticipantName,
    pub requested_moderator: Option<bool>,
    pub media: MediaState,
    pub connection: Arc<dyn ParticipantConnection>,
}

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRoom {
    pub session: SessionContext,
    pub is_moderator: bool,
    pub room_created: bool,
}

/// 参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    notifier: Arc<dyn RoomNotifier>,
}

impl JoinRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, notifier: Arc<dyn RoomNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Admit a participant.
    ///
    /// # Errors
    ///
    /// `JoinError::RoomFull` when the room is at capacity. Nothing is mutated
    /// in that case, and a room created only for this attempt is removed again.
    pub async fn execute(&self, command: JoinRoomCommand) -> Result<JoinedRoom, JoinError> {
        let participant_id = ParticipantIdFactory::generate().map_err(JoinError::IdAssignment)?;
        let now = Timestamp::now();
        let code = command.room_code;

        let mut registry = self.repository.lock().await;
        let (room, created) = registry.get_or_create(&code, now);
        if created {
            info!("Room '{}' created", code);
        }

        let mut participant = Participant::new(
            participant_id.clone(),
            command.name,
            command.connection,
            code.clone(),
            now,
        )
        .with_media(command.media);
        participant.is_moderator = command.requested_moderator.unwrap_or(false);

        if let Err(e) = room.add_participant(participant) {
            if created {
                registry.remove(&code);
                info!("Room '{}' removed after rejected join", code);
            }
            return Err(match e {
                RoomError::CapacityExceeded { capacity } => JoinError::RoomFull { capacity },
                other => JoinError::Rejected(other),
            });
        }

        let joined = room.participant(&participant_id).ok_or_else(|| {
            JoinError::Rejected(RoomError::ParticipantNotFound(participant_id.clone()))
        })?;
        let is_moderator = joined.is_moderator;
        let snapshot = ParticipantSnapshot::from(joined);

        let reply = RoomEvent::Joined {
            room_code: code.clone(),
            participant_id: participant_id.clone(),
            is_moderator,
            config: room.config,
            participants: room
                .participants()
                .filter(|p| p.id != participant_id)
                .map(ParticipantSnapshot::from)
                .collect(),
            chat_history: room.chat_history.iter().cloned().collect(),
        };
        self.notifier.notify(joined, &reply);

        self.notifier.broadcast(
            room,
            &RoomEvent::ParticipantJoined(snapshot),
            Some(&participant_id),
        );

        info!(
            "Participant '{}' joined room '{}' ({} participants, moderator={})",
            participant_id,
            code,
            room.len(),
            is_moderator
        );

        Ok(JoinedRoom {
            session: SessionContext::new(participant_id, code),
            is_moderator,
            room_created: created,
        })
    }
}
