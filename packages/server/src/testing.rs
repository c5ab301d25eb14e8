//! Test doubles shared by unit tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    domain::{
        DeliveryError, OutboundPayload, Participant, ParticipantConnection, ParticipantId,
        ParticipantName, RoomCode, RoomNotifier, Timestamp,
    },
    infrastructure::{broadcast::WebSocketNotifier, repository::InMemoryRoomRepository},
};

/// In-memory connection that records every delivered payload.
#[derive(Default)]
pub struct StubConnection {
    open: AtomicBool,
    closed: AtomicBool,
    delivered: Mutex<Vec<String>>,
}

impl StubConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            open: AtomicBool::new(true),
            ..Self::default()
        })
    }

    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Delivered payloads parsed as JSON, oldest first.
    pub fn messages(&self) -> Vec<serde_json::Value> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|raw| serde_json::from_str(raw).unwrap())
            .collect()
    }

    /// `type` tags of delivered payloads, oldest first.
    pub fn types(&self) -> Vec<String> {
        self.messages()
            .iter()
            .map(|m| m["type"].as_str().unwrap().to_string())
            .collect()
    }
}

impl ParticipantConnection for StubConnection {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn try_deliver(&self, payload: OutboundPayload) -> Result<(), DeliveryError> {
        if !self.is_open() {
            return Err(DeliveryError::Closed);
        }
        self.delivered.lock().unwrap().push(payload.to_string());
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.set_open(false);
    }
}

pub fn room_code(code: &str) -> RoomCode {
    RoomCode::new(code.to_string()).unwrap()
}

pub fn participant_id(id: &str) -> ParticipantId {
    ParticipantId::new(id.to_string()).unwrap()
}

/// Participant named after its id, connected through a fresh open stub.
pub fn participant(id: &str, joined_at: i64) -> Participant {
    participant_with(id, joined_at, StubConnection::new())
}

pub fn participant_with(id: &str, joined_at: i64, connection: Arc<StubConnection>) -> Participant {
    Participant::new(
        participant_id(id),
        ParticipantName::new(id.to_string()),
        connection,
        room_code("ABC123"),
        Timestamp::new(joined_at),
    )
}

pub fn join_command(
    code: &str,
    name: &str,
    connection: Arc<StubConnection>,
) -> crate::usecase::JoinRoomCommand {
    crate::usecase::JoinRoomCommand {
        room_code: room_code(code),
        name: ParticipantName::new(name.to_string()),
        requested_moderator: None,
        media: crate::domain::MediaState::default(),
        connection,
    }
}

/// Notifier that encodes events exactly as the server does.
pub fn notifier() -> Arc<dyn RoomNotifier> {
    Arc::new(WebSocketNotifier)
}

/// Join `code` as `name` through the real use case.
pub async fn join(
    repository: &Arc<InMemoryRoomRepository>,
    code: &str,
    name: &str,
) -> (crate::usecase::SessionContext, Arc<StubConnection>) {
    let connection = StubConnection::new();
    let joined = crate::usecase::JoinRoomUseCase::new(repository.clone(), notifier())
        .execute(join_command(code, name, connection.clone()))
        .await
        .unwrap();
    (joined.session, connection)
}
