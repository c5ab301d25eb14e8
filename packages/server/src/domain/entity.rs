//! Core domain models for the signaling server.

use std::{fmt, sync::Arc};

use super::{
    chat_history::{ChatHistory, DEFAULT_CHAT_HISTORY_CAPACITY},
    connection::ParticipantConnection,
    error::RoomError,
    value_object::{
        ChatMessageId, MessageContent, ParticipantId, ParticipantName, RoomCode, Timestamp,
    },
};

/// Default maximum number of participants allowed in a room
pub const DEFAULT_MAX_PARTICIPANTS: usize = 50;

/// Settings fixed when a room is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomConfig {
    pub enable_chat: bool,
    pub enable_screen_share: bool,
    pub enable_recording: bool,
    pub max_participants: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            enable_chat: true,
            enable_screen_share: true,
            enable_recording: false,
            max_participants: DEFAULT_MAX_PARTICIPANTS,
        }
    }
}

/// Negotiated media flags of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaState {
    pub audio_enabled: bool,
    pub video_enabled: bool,
    pub hand_raised: bool,
    pub screen_sharing: bool,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            video_enabled: true,
            hand_raised: false,
            screen_sharing: false,
        }
    }
}

/// A single change a participant requests for its own media state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaStateChange {
    Audio(bool),
    Video(bool),
    Hand(bool),
    ScreenShare(bool),
}

impl MediaState {
    pub fn apply(&mut self, change: MediaStateChange) {
        match change {
            MediaStateChange::Audio(enabled) => self.audio_enabled = enabled,
            MediaStateChange::Video(enabled) => self.video_enabled = enabled,
            MediaStateChange::Hand(raised) => self.hand_raised = raised,
            MediaStateChange::ScreenShare(enabled) => self.screen_sharing = enabled,
        }
    }
}

/// One connected client's identity and media state within a room.
pub struct Participant {
    pub id: ParticipantId,
    pub name: ParticipantName,
    /// Outbound connection, owned by this session
    pub connection: Arc<dyn ParticipantConnection>,
    pub room_code: RoomCode,
    pub media: MediaState,
    pub is_moderator: bool,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(
        id: ParticipantId,
        name: ParticipantName,
        connection: Arc<dyn ParticipantConnection>,
        room_code: RoomCode,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            connection,
            room_code,
            media: MediaState::default(),
            is_moderator: false,
            joined_at,
        }
    }

    pub fn with_media(mut self, media: MediaState) -> Self {
        self.media = media;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_open()
    }
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Participant")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("room_code", &self.room_code)
            .field("media", &self.media)
            .field("is_moderator", &self.is_moderator)
            .field("joined_at", &self.joined_at)
            .finish_non_exhaustive()
    }
}

/// Copy of a participant's public state, detached from its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSnapshot {
    pub id: ParticipantId,
    pub name: ParticipantName,
    pub is_moderator: bool,
    pub media: MediaState,
    pub joined_at: Timestamp,
}

impl From<&Participant> for ParticipantSnapshot {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            is_moderator: p.is_moderator,
            media: p.media,
            joined_at: p.joined_at,
        }
    }
}

/// A chat message as kept in the room history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub sender_id: ParticipantId,
    /// Display name at the time of sending
    pub sender_name: ParticipantName,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(
        id: ChatMessageId,
        sender_id: ParticipantId,
        sender_name: ParticipantName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            sender_id,
            sender_name,
            content,
            timestamp,
        }
    }
}

/// A meeting room: the unit of broadcast scope.
#[derive(Debug)]
pub struct Room {
    pub code: RoomCode,
    /// Participants in join order
    participants: Vec<Participant>,
    pub created_at: Timestamp,
    pub chat_history: ChatHistory,
    pub config: RoomConfig,
}

impl Room {
    /// Create a new empty room with the default chat history capacity
    pub fn new(code: RoomCode, config: RoomConfig, created_at: Timestamp) -> Self {
        Self::with_history_capacity(code, config, created_at, DEFAULT_CHAT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(
        code: RoomCode,
        config: RoomConfig,
        created_at: Timestamp,
        history_capacity: usize,
    ) -> Self {
        Self {
            code,
            participants: Vec::new(),
            created_at,
            chat_history: ChatHistory::with_capacity(history_capacity),
            config,
        }
    }

    /// Add a participant to the room.
    ///
    /// The first participant of an empty room always becomes moderator; later
    /// participants keep whatever moderator flag they were created with.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::CapacityExceeded` if the room is full and
    /// `RoomError::DuplicateParticipant` if the id is already present. The room
    /// is left untouched in both cases.
    pub fn add_participant(&mut self, mut participant: Participant) -> Result<(), RoomError> {
        if self.is_full() {
            return Err(RoomError::CapacityExceeded {
                capacity: self.config.max_participants,
            });
        }
        if self.participant(&participant.id).is_some() {
            return Err(RoomError::DuplicateParticipant(participant.id));
        }
        if self.participants.is_empty() {
            participant.is_moderator = true;
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Remove a participant by id, returning it if present.
    pub fn remove_participant(&mut self, participant_id: &ParticipantId) -> Option<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| &p.id == participant_id)?;
        Some(self.participants.remove(index))
    }

    /// Get a participant by ID
    pub fn participant(&self, participant_id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == participant_id)
    }

    pub fn participant_mut(&mut self, participant_id: &ParticipantId) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| &p.id == participant_id)
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.config.max_participants
    }

    pub fn has_moderator(&self) -> bool {
        self.participants.iter().any(|p| p.is_moderator)
    }

    /// Promote the longest-present participant if nobody is moderator.
    ///
    /// Ties on `joined_at` go to whoever joined first. Returns the id of the
    /// newly promoted participant, or `None` if the room is empty or already
    /// has a moderator.
    pub fn promote_successor(&mut self) -> Option<ParticipantId> {
        if self.has_moderator() {
            return None;
        }
        let successor = self.participants.iter_mut().min_by_key(|p| p.joined_at)?;
        successor.is_moderator = true;
        Some(successor.id.clone())
    }

    /// Append a chat message to the bounded history.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::ChatDisabled` if the room does not allow chat.
    pub fn append_chat(&mut self, message: ChatMessage) -> Result<Option<ChatMessage>, RoomError> {
        if !self.config.enable_chat {
            return Err(RoomError::ChatDisabled);
        }
        Ok(self.chat_history.push(message))
    }

    /// Ids of participants whose connection is no longer open.
    pub fn disconnected_participants(&self) -> Vec<ParticipantId> {
        self.participants
            .iter()
            .filter(|p| !p.is_connected())
            .map(|p| p.id.clone())
            .collect()
    }
}
