//! UseCase: periodic sweep of dead connections
//!
//! Safety net for connections that vanished without a close event reaching
//! the handler. Every participant whose connection is no longer open gets the
//! same cleanup as an explicit leave and has its socket closed; rooms left
//! empty are then removed.

use std::sync::Arc;

use tracing::info;

use crate::domain::{RoomNotifier, RoomRepository};

use super::leave_room::depart;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub removed_participants: usize,
    pub removed_rooms: usize,
}

/// 定期クリーンアップのユースケース
pub struct SweepUseCase {
    repository: Arc<dyn RoomRepository>,
    notifier: Arc<dyn RoomNotifier>,
}

impl SweepUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, notifier: Arc<dyn RoomNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    pub async fn execute(&self) -> SweepReport {
        let mut registry = self.repository.lock().await;
        let mut report = SweepReport::default();

        for code in registry.codes() {
            let dead: Vec<_> = match registry.get(&code) {
                Some(room) => room
                    .disconnected_participants()
                    .into_iter()
                    .filter_map(|id| {
                        let connection = room.participant(&id)?.connection.clone();
                        Some((id, connection))
                    })
                    .collect(),
                None => continue,
            };
            for (participant_id, connection) in dead {
                connection.close();
                let departure = depart(
                    &mut registry,
                    self.notifier.as_ref(),
                    &code,
                    &participant_id,
                );
                if let Some(departure) = departure {
                    report.removed_participants += 1;
                    if departure.room_removed {
                        report.removed_rooms += 1;
                    }
                }
            }
        }

        report.removed_rooms += registry.remove_empty_rooms().len();

        if report.removed_participants > 0 || report.removed_rooms > 0 {
            info!(
                "Sweep removed {} participant(s) and {} room(s)",
                report.removed_participants, report.removed_rooms
            );
        }
        report
    }
}
