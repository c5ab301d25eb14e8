//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::ParticipantId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("RoomCode cannot be empty")]
    RoomCodeEmpty,

    #[error("RoomCode cannot exceed {max} characters (got {actual})")]
    RoomCodeTooLong { max: usize, actual: usize },

    #[error("ParticipantId cannot be empty")]
    ParticipantIdEmpty,

    #[error("ParticipantId cannot exceed {max} characters (got {actual})")]
    ParticipantIdTooLong { max: usize, actual: usize },

    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    #[error("MessageContent cannot exceed {max} bytes (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors related to Room domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// Room capacity exceeded error
    #[error("Room is full: maximum {capacity} participants allowed")]
    CapacityExceeded { capacity: usize },

    /// A participant with the same id is already in the room
    #[error("Participant '{0}' is already in the room")]
    DuplicateParticipant(ParticipantId),

    #[error("Participant '{0}' not found")]
    ParticipantNotFound(ParticipantId),

    #[error("Chat is disabled in this room")]
    ChatDisabled,
}
