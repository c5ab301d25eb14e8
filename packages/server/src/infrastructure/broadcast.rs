//! Fan-out engine: delivers server messages to room members.
//!
//! Delivery never waits on a slow client. Connections that are not open are
//! skipped; reaping them is the sweep's job.

use tracing::{debug, error, warn};

use crate::{
    domain::{
        DeliveryError, OutboundPayload, Participant, ParticipantConnection, ParticipantId, Room,
        RoomEvent, RoomNotifier,
    },
    infrastructure::dto::websocket::ServerMessage,
};

/// [`RoomNotifier`] that encodes room events as WebSocket JSON frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketNotifier;

impl RoomNotifier for WebSocketNotifier {
    fn broadcast(&self, room: &Room, event: &RoomEvent, exclude: Option<&ParticipantId>) -> usize {
        broadcast(room, &ServerMessage::from(event), exclude).delivered
    }

    fn notify(&self, participant: &Participant, event: &RoomEvent) -> bool {
        send_to(participant, &ServerMessage::from(event))
    }
}

/// Outcome of a broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    /// Closed connections and full queues
    pub skipped: usize,
}

/// Deliver `message` to every participant of `room` except `exclude`.
pub fn broadcast(
    room: &Room,
    message: &ServerMessage,
    exclude: Option<&ParticipantId>,
) -> BroadcastReport {
    let Some(payload) = serialize(message) else {
        return BroadcastReport::default();
    };

    let mut report = BroadcastReport::default();
    for participant in room.participants() {
        if exclude == Some(&participant.id) {
            continue;
        }
        if deliver(participant, payload.clone()) {
            report.delivered += 1;
        } else {
            report.skipped += 1;
        }
    }
    debug!(
        "Broadcast to room '{}': delivered={}, skipped={}",
        room.code, report.delivered, report.skipped
    );
    report
}

/// Deliver `message` to a single participant.
pub fn send_to(participant: &Participant, message: &ServerMessage) -> bool {
    match serialize(message) {
        Some(payload) => deliver(participant, payload),
        None => false,
    }
}

/// Deliver `message` on a raw connection, e.g. a reply to a client that has
/// not joined a room yet.
pub fn send_on(connection: &dyn ParticipantConnection, message: &ServerMessage) -> bool {
    let Some(payload) = serialize(message) else {
        return false;
    };
    if !connection.is_open() {
        return false;
    }
    match connection.try_deliver(payload) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to deliver reply: {}", e);
            false
        }
    }
}

fn deliver(participant: &Participant, payload: OutboundPayload) -> bool {
    if !participant.is_connected() {
        debug!(
            "Skipping participant '{}': connection not open",
            participant.id
        );
        return false;
    }
    match participant.connection.try_deliver(payload) {
        Ok(()) => true,
        Err(DeliveryError::QueueFull) => {
            warn!(
                "Outbound queue full for participant '{}', dropping message",
                participant.id
            );
            false
        }
        Err(DeliveryError::Closed) => {
            debug!("Participant '{}' closed during delivery", participant.id);
            false
        }
    }
}

fn serialize(message: &ServerMessage) -> Option<OutboundPayload> {
    match message.to_payload() {
        Ok(payload) => Some(payload),
        Err(e) => {
            error!("Failed to serialize server message: {}", e);
            None
        }
    }
}
