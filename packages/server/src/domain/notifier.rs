//! Outbound notification seam.

use super::{
    entity::{Participant, Room},
    event::RoomEvent,
    value_object::ParticipantId,
};

/// Delivers room events to participants.
///
/// Implementations must not block: they are called while the registry is
/// locked.
pub trait RoomNotifier: Send + Sync {
    /// Deliver `event` to every member of `room` except `exclude`.
    ///
    /// Returns how many participants it reached.
    fn broadcast(&self, room: &Room, event: &RoomEvent, exclude: Option<&ParticipantId>) -> usize;

    /// Deliver `event` to one participant.
    fn notify(&self, participant: &Participant, event: &RoomEvent) -> bool;
}
