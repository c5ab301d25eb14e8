//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use kaigi_shared::time::millis_to_rfc3339;

use crate::{
    infrastructure::dto::http::{ParticipantDetailDto, RoomDetailDto, RoomSummaryDto, StatsDto},
    ui::state::AppState,
    usecase::{RoomInfoUseCase, RoomSnapshot},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Room and participant counters
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsDto> {
    let stats = RoomInfoUseCase::new(state.repository.clone()).stats().await;
    Json(StatsDto {
        rooms: stats.rooms,
        participants: stats.participants,
    })
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = RoomInfoUseCase::new(state.repository.clone()).list().await;
    Json(rooms.iter().map(to_summary).collect())
}

/// Get room detail by code
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let Some(room) = RoomInfoUseCase::new(state.repository.clone())
        .lookup(&code)
        .await
    else {
        tracing::debug!("Room '{}' not found", code);
        return Err(StatusCode::NOT_FOUND);
    };

    Ok(Json(RoomDetailDto {
        code: room.code.as_str().to_string(),
        participant_count: room.participant_count(),
        participants: room
            .participants
            .iter()
            .map(|p| ParticipantDetailDto {
                id: p.id.as_str().to_string(),
                name: p.name.as_str().to_string(),
                is_moderator: p.is_moderator,
                joined_at: millis_to_rfc3339(p.joined_at.value()),
            })
            .collect(),
        created_at: millis_to_rfc3339(room.created_at.value()),
        config: room.config.into(),
    }))
}

fn to_summary(room: &RoomSnapshot) -> RoomSummaryDto {
    RoomSummaryDto {
        code: room.code.as_str().to_string(),
        participant_count: room.participant_count(),
        created_at: millis_to_rfc3339(room.created_at.value()),
        config: room.config.into(),
    }
}
