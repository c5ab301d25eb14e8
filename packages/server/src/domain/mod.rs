//! Domain layer for the signaling server.
//!
//! This module contains room and participant rules that are independent of
//! the wire format and the transport.

pub mod chat_history;
pub mod connection;
pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod notifier;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use chat_history::{ChatHistory, DEFAULT_CHAT_HISTORY_CAPACITY};
pub use connection::{DeliveryError, OutboundPayload, ParticipantConnection};
pub use entity::{
    ChatMessage, DEFAULT_MAX_PARTICIPANTS, MediaState, MediaStateChange, Participant,
    ParticipantSnapshot, Room, RoomConfig,
};
pub use error::{RoomError, ValueObjectError};
pub use event::{RoomEvent, SignalKind};
pub use factory::{ChatMessageIdFactory, ParticipantIdFactory};
pub use notifier::RoomNotifier;
pub use registry::RoomRegistry;
pub use repository::{RegistryGuard, RoomRepository};
pub use value_object::{
    ChatMessageId, MessageContent, ParticipantId, ParticipantName, RoomCode, Timestamp,
};

#[cfg(test)]
pub use connection::MockParticipantConnection;
