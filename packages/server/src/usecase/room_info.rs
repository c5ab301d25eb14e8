//! UseCase: read-only room queries
//!
//! Backs the `get-room-info` message and the HTTP statistics endpoints.
//! Nothing here creates or mutates a room.

use std::sync::Arc;

use crate::domain::{ParticipantSnapshot, Room, RoomCode, RoomConfig, RoomRepository, Timestamp};

/// Point-in-time copy of a room, detached from the registry lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub code: RoomCode,
    pub created_at: Timestamp,
    pub config: RoomConfig,
    pub participants: Vec<ParticipantSnapshot>,
}

impl RoomSnapshot {
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }
}

impl From<&Room> for RoomSnapshot {
    fn from(room: &Room) -> Self {
        Self {
            code: room.code.clone(),
            created_at: room.created_at,
            config: room.config,
            participants: room.participants().map(ParticipantSnapshot::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub rooms: usize,
    pub participants: usize,
}

/// ルーム情報参照のユースケース
pub struct RoomInfoUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl RoomInfoUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Look up a room by code. Invalid codes simply do not exist.
    pub async fn lookup(&self, code: &str) -> Option<RoomSnapshot> {
        let code = RoomCode::new(code.to_string()).ok()?;
        let registry = self.repository.lock().await;
        registry.get(&code).map(RoomSnapshot::from)
    }

    /// All rooms, ordered by code.
    pub async fn list(&self) -> Vec<RoomSnapshot> {
        let registry = self.repository.lock().await;
        let mut rooms: Vec<RoomSnapshot> = registry.rooms().map(RoomSnapshot::from).collect();
        rooms.sort_by(|a, b| a.code.cmp(&b.code));
        rooms
    }

    pub async fn stats(&self) -> RegistryStats {
        let registry = self.repository.lock().await;
        RegistryStats {
            rooms: registry.len(),
            participants: registry.participant_count(),
        }
    }
}
