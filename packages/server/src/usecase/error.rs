//! UseCase layer error definitions.
//!
//! `Display` texts are sent verbatim to clients in `error` replies.

use thiserror::Error;

use crate::domain::{RoomCode, RoomError, ValueObjectError};

/// The sending connection has no room context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Not joined to a room")]
    NotJoined,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    #[error("Room is full: maximum {capacity} participants allowed")]
    RoomFull { capacity: usize },

    #[error("Already joined room '{0}'")]
    AlreadyJoined(RoomCode),

    #[error("Invalid room code: {0}")]
    InvalidRoomCode(ValueObjectError),

    #[error("Could not assign a participant id: {0}")]
    IdAssignment(ValueObjectError),

    #[error(transparent)]
    Rejected(RoomError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Chat is disabled in this room")]
    Disabled,

    #[error("Invalid chat message: {0}")]
    InvalidContent(#[from] ValueObjectError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaStateError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Cannot change another participant's state")]
    ForeignParticipant,

    #[error("Screen sharing is disabled in this room")]
    ScreenShareDisabled,
}
