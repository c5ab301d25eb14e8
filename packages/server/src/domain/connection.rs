//! Outbound side of a participant's transport connection.
//!
//! The domain only needs to know whether a connection is still usable and to
//! hand it pre-serialized payloads without blocking. The WebSocket-backed
//! implementation lives in `infrastructure::connection`.

use std::sync::Arc;

use thiserror::Error;

/// A serialized server-to-client message, shared between all recipients of a
/// broadcast.
pub type OutboundPayload = Arc<str>;

/// Why a payload could not be queued for a connection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("outbound queue is full")]
    QueueFull,

    #[error("connection is closed")]
    Closed,
}

/// Handle to the outbound half of a participant's connection.
///
/// Implementations must never block: `try_deliver` either enqueues the payload
/// or fails immediately.
#[cfg_attr(test, mockall::automock)]
pub trait ParticipantConnection: Send + Sync {
    /// Whether the connection is open and has passed its liveness checks.
    fn is_open(&self) -> bool;

    /// Queue a payload for delivery.
    fn try_deliver(&self, payload: OutboundPayload) -> Result<(), DeliveryError>;

    /// Abandon the connection. Called when the owning session is discarded.
    fn close(&self);
}
