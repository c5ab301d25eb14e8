//! UseCase: point-to-point relay of offer / answer / ICE candidate payloads
//!
//! Payloads are forwarded untouched to exactly one participant of the
//! sender's own room. A target that already left is an expected race and
//! the payload is dropped without telling the sender.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{ParticipantId, RoomEvent, RoomNotifier, RoomRepository, SignalKind};

use super::{
    error::SessionError,
    session::{SessionContext, sender_room},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Delivered,
    /// Target not in the sender's room, or its connection is gone
    Dropped,
}

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    repository: Arc<dyn RoomRepository>,
    notifier: Arc<dyn RoomNotifier>,
}

impl RelaySignalUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, notifier: Arc<dyn RoomNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    pub async fn execute(
        &self,
        session: &SessionContext,
        target: &str,
        kind: SignalKind,
        payload: serde_json::Value,
    ) -> Result<RelayOutcome, SessionError> {
        let mut registry = self.repository.lock().await;
        let room = sender_room(&mut registry, session)?;

        let recipient = ParticipantId::new(target.to_string())
            .ok()
            .and_then(|id| room.participant(&id));
        let Some(recipient) = recipient else {
            debug!(
                "Dropping {:?} from '{}': target '{}' not in room '{}'",
                kind, session.participant_id, target, session.room_code
            );
            return Ok(RelayOutcome::Dropped);
        };

        let event = RoomEvent::Signal {
            kind,
            sender: session.participant_id.clone(),
            payload,
        };
        if self.notifier.notify(recipient, &event) {
            Ok(RelayOutcome::Delivered)
        } else {
            Ok(RelayOutcome::Dropped)
        }
    }
}
