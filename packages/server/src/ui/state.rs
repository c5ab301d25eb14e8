//! Server state shared by all handlers.

use std::sync::Arc;

use crate::{
    config::ServerConfig,
    domain::{RoomNotifier, RoomRepository},
    infrastructure::{broadcast::WebSocketNotifier, repository::InMemoryRoomRepository},
};

/// Shared application state
pub struct AppState {
    /// Room registry behind its single lock
    pub repository: Arc<dyn RoomRepository>,
    pub notifier: Arc<dyn RoomNotifier>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let repository = Arc::new(InMemoryRoomRepository::with_config(
            config.room_defaults,
            config.chat_history_capacity,
        ));
        Self {
            repository,
            notifier: Arc::new(WebSocketNotifier),
            config,
        }
    }
}
