//! Repository trait for room storage.
//!
//! ドメイン層はストレージの抽象だけを定義し、具体的な実装は Infrastructure 層が提供します
//! （依存性の逆転）。

use std::ops::DerefMut;

use async_trait::async_trait;

use super::registry::RoomRegistry;

/// Exclusive access to the registry. The lock is released when dropped.
pub type RegistryGuard<'a> = Box<dyn DerefMut<Target = RoomRegistry> + Send + 'a>;

/// Room storage
///
/// Use cases perform a mutation and its resulting notifications while holding
/// one guard, so every room observes events in a single total order.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Wait for exclusive access to the registry.
    async fn lock<'a>(&'a self) -> RegistryGuard<'a>;

    async fn room_count(&self) -> usize {
        self.lock().await.len()
    }

    async fn participant_count(&self) -> usize {
        self.lock().await.participant_count()
    }
}
