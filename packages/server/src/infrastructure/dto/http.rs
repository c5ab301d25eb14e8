//! HTTP API response DTOs for the signaling server.

use serde::{Deserialize, Serialize};

use super::websocket::RoomConfigDto;

/// Room summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub code: String,
    pub participant_count: usize,
    pub created_at: String, // ISO 8601
    pub config: RoomConfigDto,
}

/// Room detail for detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub code: String,
    pub participant_count: usize,
    pub participants: Vec<ParticipantDetailDto>,
    pub created_at: String, // ISO 8601
    pub config: RoomConfigDto,
}

/// Participant detail for room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub id: String,
    pub name: String,
    pub is_moderator: bool,
    pub joined_at: String, // ISO 8601
}

/// Server-wide counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsDto {
    pub rooms: usize,
    pub participants: usize,
}
