//! In-memory room repository.
//!
//! All room state lives in one [`RoomRegistry`] behind a single
//! `tokio::sync::Mutex`. Every use case performs its mutation and the
//! resulting fan-out while holding the guard, so each room sees broadcasts in
//! the order the server processed them. Delivery only enqueues into bounded
//! per-connection queues, so the guard is never held across socket I/O.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RegistryGuard, RoomConfig, RoomRegistry, RoomRepository};

/// インメモリ Room Repository 実装
///
/// ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
pub struct InMemoryRoomRepository {
    registry: Mutex<RoomRegistry>,
}

impl InMemoryRoomRepository {
    pub fn new(registry: RoomRegistry) -> Self {
        Self {
            registry: Mutex::new(registry),
        }
    }

    /// Repository whose rooms are created with `default_config`.
    pub fn with_config(default_config: RoomConfig, history_capacity: usize) -> Self {
        Self::new(RoomRegistry::with_history_capacity(
            default_config,
            history_capacity,
        ))
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn lock<'a>(&'a self) -> RegistryGuard<'a> {
        Box::new(self.registry.lock().await)
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new(RoomRegistry::default())
    }
}
