//! UseCase: chat message
//!
//! Appends to the room's bounded history and echoes the message to the
//! whole room, sender included, so every client renders the same
//! server-ordered copy.

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    ChatMessage, ChatMessageIdFactory, MessageContent, RoomEvent, RoomNotifier, RoomRepository,
    Timestamp,
};

use super::{
    error::{ChatError, SessionError},
    session::{SessionContext, sender_room},
};

/// メッセージ送信のユースケース
pub struct SendChatUseCase {
    repository: Arc<dyn RoomRepository>,
    notifier: Arc<dyn RoomNotifier>,
}

impl SendChatUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, notifier: Arc<dyn RoomNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Returns the stored message as it was broadcast.
    ///
    /// # Errors
    ///
    /// `ChatError::Disabled` if the room does not allow chat; nothing is
    /// stored or broadcast in that case.
    pub async fn execute(
        &self,
        session: &SessionContext,
        text: String,
    ) -> Result<ChatMessage, ChatError> {
        let content = MessageContent::new(text)?;

        let mut registry = self.repository.lock().await;
        let room = sender_room(&mut registry, session)?;
        let sender_name = room
            .participant(&session.participant_id)
            .map(|p| p.name.clone())
            .ok_or(SessionError::NotJoined)?;

        let message = ChatMessage::new(
            ChatMessageIdFactory::generate(),
            session.participant_id.clone(),
            sender_name,
            content,
            Timestamp::now(),
        );
        room.append_chat(message.clone()).map_err(|_| ChatError::Disabled)?;

        let delivered = self.notifier.broadcast(room, &RoomEvent::Chat(message.clone()), None);
        info!(
            "Chat message from '{}' in room '{}' delivered to {} participant(s)",
            session.participant_id, session.room_code, delivered
        );
        Ok(message)
    }
}
