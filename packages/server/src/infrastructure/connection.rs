//! Bounded-channel implementation of [`ParticipantConnection`].
//!
//! Each WebSocket gets one `ChannelConnection`. Broadcasts enqueue into its
//! bounded queue without ever waiting; a writer task owned by the WebSocket
//! handler drains the queue into the socket. Liveness is tracked here so the
//! sweep and the fan-out engine can ask `is_open()` without touching the
//! socket.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU32, Ordering},
};

use tokio::sync::{
    mpsc::{self, error::TrySendError},
    watch,
};

use crate::domain::{DeliveryError, OutboundPayload, ParticipantConnection};

/// Unanswered pings after which the peer is considered gone.
///
/// One missed ping is tolerated; the second consecutive one is not.
const MAX_OUTSTANDING_PINGS: u32 = 2;

pub struct ChannelConnection {
    sender: mpsc::Sender<OutboundPayload>,
    outstanding_pings: AtomicU32,
    alive: AtomicBool,
    closed: watch::Sender<bool>,
}

impl ChannelConnection {
    /// Create a connection with an outbound queue of `capacity` payloads.
    ///
    /// The receiver is meant for the task that writes to the socket.
    pub fn new(capacity: usize) -> (Arc<Self>, mpsc::Receiver<OutboundPayload>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let (closed, _) = watch::channel(false);
        let connection = Arc::new(Self {
            sender,
            outstanding_pings: AtomicU32::new(0),
            alive: AtomicBool::new(true),
            closed,
        });
        (connection, receiver)
    }

    /// Any inbound frame (pong included) proves the peer is still there.
    pub fn record_activity(&self) {
        self.outstanding_pings.store(0, Ordering::SeqCst);
    }

    /// Account for a keepalive ping about to be sent.
    ///
    /// Returns `false` once too many pings went unanswered; the connection
    /// is then marked dead and `is_open()` reports `false` from here on.
    pub fn begin_ping(&self) -> bool {
        let outstanding = self.outstanding_pings.fetch_add(1, Ordering::SeqCst);
        if outstanding >= MAX_OUTSTANDING_PINGS {
            self.mark_dead();
            return false;
        }
        true
    }

    /// Mark the transport as gone without closing the session.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Watch that flips to `true` when the owning session closes this
    /// connection.
    pub fn subscribe_closed(&self) -> watch::Receiver<bool> {
        self.closed.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

impl ParticipantConnection for ChannelConnection {
    fn is_open(&self) -> bool {
        !self.is_closed() && self.alive.load(Ordering::SeqCst) && !self.sender.is_closed()
    }

    fn try_deliver(&self, payload: OutboundPayload) -> Result<(), DeliveryError> {
        if !self.is_open() {
            return Err(DeliveryError::Closed);
        }
        self.sender.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::QueueFull,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    fn close(&self) {
        self.closed.send_replace(true);
    }
}
