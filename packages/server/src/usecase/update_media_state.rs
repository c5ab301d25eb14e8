//! UseCase: audio / video / hand-raise / screen-share changes
//!
//! A participant may only change its own flags. The new state is announced to
//! the rest of the room; the sender already knows it. A single message may
//! carry several changes, which are applied together or not at all.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{MediaStateChange, RoomEvent, RoomNotifier, RoomRepository};

use super::{
    error::MediaStateError,
    session::{SessionContext, sender_room},
};

/// メディア状態変更のユースケース
pub struct UpdateMediaStateUseCase {
    repository: Arc<dyn RoomRepository>,
    notifier: Arc<dyn RoomNotifier>,
}

impl UpdateMediaStateUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, notifier: Arc<dyn RoomNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Apply `change` to the sender's own session.
    ///
    /// `claimed_participant_id` is whatever id the client put in the message,
    /// if any. Naming anyone but the sender rejects the whole message.
    pub async fn execute(
        &self,
        session: &SessionContext,
        change: MediaStateChange,
        claimed_participant_id: Option<&str>,
    ) -> Result<(), MediaStateError> {
        self.apply_all(session, &[change], claimed_participant_id).await
    }

    /// Apply several changes as one message: all of them or none.
    ///
    /// Each applied change is announced separately, in order.
    pub async fn apply_all(
        &self,
        session: &SessionContext,
        changes: &[MediaStateChange],
        claimed_participant_id: Option<&str>,
    ) -> Result<(), MediaStateError> {
        if let Some(claimed) = claimed_participant_id
            && claimed != session.participant_id.as_str()
        {
            warn!(
                "Participant '{}' tried to change state of '{}'",
                session.participant_id, claimed
            );
            return Err(MediaStateError::ForeignParticipant);
        }

        let mut registry = self.repository.lock().await;
        let room = sender_room(&mut registry, session)?;

        let starts_sharing = changes
            .iter()
            .any(|change| matches!(change, MediaStateChange::ScreenShare(true)));
        if starts_sharing && !room.config.enable_screen_share {
            return Err(MediaStateError::ScreenShareDisabled);
        }

        for &change in changes {
            if let Some(participant) = room.participant_mut(&session.participant_id) {
                participant.media.apply(change);
            }
            debug!(
                "Participant '{}' in room '{}' changed {:?}",
                session.participant_id, session.room_code, change
            );

            let event = RoomEvent::MediaChanged {
                participant_id: session.participant_id.clone(),
                change,
            };
            self.notifier.broadcast(room, &event, Some(&session.participant_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomConfig, RoomRegistry},
        infrastructure::repository::InMemoryRoomRepository,
        testing::{join, notifier, room_code},
        usecase::SessionContext,
    };

    fn media_of(registry: &RoomRegistry, session: &SessionContext) -> crate::domain::MediaState {
        registry
            .get(&session.room_code)
            .and_then(|room| room.participant(&session.participant_id))
            .map(|p| p.media)
            .unwrap()
    }

    #[tokio::test]
    async fn test_toggle_audio_updates_sender_and_notifies_others() {
        // テスト項目: 音声の切り替えは送信者の状態だけを変更し、他の参加者に通知される
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let (alice, alice_conn) = join(&repository, "ABC123", "Alice").await;
        let (bob, bob_conn) = join(&repository, "ABC123", "Bob").await;
        let alice_before = alice_conn.messages().len();

        // when (操作):
        UpdateMediaStateUseCase::new(repository.clone(), notifier())
            .execute(&bob, MediaStateChange::Audio(false), None)
            .await
            .unwrap();

        // then (期待する結果):
        let registry = repository.lock().await;
        assert!(!media_of(&registry, &bob).audio_enabled);
        assert!(media_of(&registry, &alice).audio_enabled);

        let notified = alice_conn.messages();
        assert_eq!(notified.len(), alice_before + 1);
        assert_eq!(
            notified.last().unwrap(),
            &serde_json::json!({
                "type": "participant-audio-changed",
                "participantId": bob.participant_id.as_str(),
                "audioEnabled": false,
            })
        );
        assert_eq!(bob_conn.types(), vec!["room-joined"]);
    }

    #[tokio::test]
    async fn test_cannot_toggle_another_participant() {
        // テスト項目: 他人の ID を指定した状態変更は拒否され、誰の状態も変わらない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let (alice, alice_conn) = join(&repository, "ABC123", "Alice").await;
        let (bob, _) = join(&repository, "ABC123", "Bob").await;
        let alice_before = alice_conn.messages().len();

        // when (操作):
        let result = UpdateMediaStateUseCase::new(repository.clone(), notifier())
            .execute(
                &bob,
                MediaStateChange::Video(false),
                Some(alice.participant_id.as_str()),
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(MediaStateError::ForeignParticipant));
        let registry = repository.lock().await;
        assert!(media_of(&registry, &alice).video_enabled);
        assert!(media_of(&registry, &bob).video_enabled);
        assert_eq!(alice_conn.messages().len(), alice_before);
    }

    #[tokio::test]
    async fn test_own_id_in_message_is_accepted() {
        // テスト項目: 自分自身の ID を明示した変更は受け付けられる
        let repository = Arc::new(InMemoryRoomRepository::default());
        let (alice, _) = join(&repository, "ABC123", "Alice").await;

        let result = UpdateMediaStateUseCase::new(repository.clone(), notifier())
            .execute(
                &alice,
                MediaStateChange::Hand(true),
                Some(alice.participant_id.as_str()),
            )
            .await;

        assert_eq!(result, Ok(()));
        let registry = repository.lock().await;
        assert!(media_of(&registry, &alice).hand_raised);
    }

    #[tokio::test]
    async fn test_screen_share_allows_multiple_sharers() {
        // テスト項目: 画面共有は同時に複数人が行える（排他制御しない）
        let repository = Arc::new(InMemoryRoomRepository::default());
        let (alice, _) = join(&repository, "ABC123", "Alice").await;
        let (bob, _) = join(&repository, "ABC123", "Bob").await;
        let usecase = UpdateMediaStateUseCase::new(repository.clone(), notifier());

        usecase
            .execute(&alice, MediaStateChange::ScreenShare(true), None)
            .await
            .unwrap();
        usecase
            .execute(&bob, MediaStateChange::ScreenShare(true), None)
            .await
            .unwrap();

        let registry = repository.lock().await;
        assert!(media_of(&registry, &alice).screen_sharing);
        assert!(media_of(&registry, &bob).screen_sharing);
    }

    #[tokio::test]
    async fn test_screen_share_disabled_by_room_config() {
        // テスト項目: 画面共有が無効なルームでは開始できない
        let config = RoomConfig {
            enable_screen_share: false,
            ..RoomConfig::default()
        };
        let repository = Arc::new(InMemoryRoomRepository::with_config(config, 100));
        let (alice, _) = join(&repository, "ABC123", "Alice").await;

        let result = UpdateMediaStateUseCase::new(repository.clone(), notifier())
            .execute(&alice, MediaStateChange::ScreenShare(true), None)
            .await;

        assert_eq!(result, Err(MediaStateError::ScreenShareDisabled));
        let registry = repository.lock().await;
        assert!(!media_of(&registry, &alice).screen_sharing);
        assert!(registry.get(&room_code("ABC123")).is_some());
    }

    #[tokio::test]
    async fn test_apply_all_changes_audio_and_video_together() {
        // テスト項目: 音声と映像をまとめて変更でき、変更ごとに他の参加者へ通知される
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let (alice, alice_conn) = join(&repository, "ABC123", "Alice").await;
        let (bob, _) = join(&repository, "ABC123", "Bob").await;

        // when (操作):
        UpdateMediaStateUseCase::new(repository.clone(), notifier())
            .apply_all(
                &bob,
                &[MediaStateChange::Audio(false), MediaStateChange::Video(false)],
                None,
            )
            .await
            .unwrap();

        // then (期待する結果):
        let registry = repository.lock().await;
        let media = media_of(&registry, &bob);
        assert!(!media.audio_enabled);
        assert!(!media.video_enabled);
        assert!(media_of(&registry, &alice).video_enabled);
        assert_eq!(
            alice_conn.types(),
            vec![
                "room-joined",
                "participant-joined",
                "participant-audio-changed",
                "participant-video-changed"
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_all_rejects_everything_when_one_change_is_refused() {
        // テスト項目: 一部の変更が拒否された場合は何も適用されない
        let config = RoomConfig {
            enable_screen_share: false,
            ..RoomConfig::default()
        };
        let repository = Arc::new(InMemoryRoomRepository::with_config(config, 100));
        let (alice, _) = join(&repository, "ABC123", "Alice").await;

        let result = UpdateMediaStateUseCase::new(repository.clone(), notifier())
            .apply_all(
                &alice,
                &[MediaStateChange::Audio(false), MediaStateChange::ScreenShare(true)],
                None,
            )
            .await;

        assert_eq!(result, Err(MediaStateError::ScreenShareDisabled));
        let registry = repository.lock().await;
        assert!(media_of(&registry, &alice).audio_enabled);
    }
}
