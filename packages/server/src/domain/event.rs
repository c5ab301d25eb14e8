//! Events published to room members.

use super::{
    entity::{ChatMessage, MediaStateChange, ParticipantSnapshot, RoomConfig},
    value_object::{ParticipantId, RoomCode},
};

/// Which negotiation step a relayed payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

/// Something a participant must be told about.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// Reply to a successful join with the state of the room
    Joined {
        room_code: RoomCode,
        participant_id: ParticipantId,
        is_moderator: bool,
        config: RoomConfig,
        /// Everyone already in the room, the joiner excluded
        participants: Vec<ParticipantSnapshot>,
        chat_history: Vec<ChatMessage>,
    },
    ParticipantJoined(ParticipantSnapshot),
    ParticipantLeft(ParticipantId),
    /// SDP or ICE payload, forwarded untouched
    Signal {
        kind: SignalKind,
        sender: ParticipantId,
        payload: serde_json::Value,
    },
    Chat(ChatMessage),
    MediaChanged {
        participant_id: ParticipantId,
        change: MediaStateChange,
    },
    ModeratorChanged(ParticipantId),
}
