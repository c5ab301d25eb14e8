//! Signaling router: dispatch of decoded client messages.
//!
//! Every handler answers in-band. Nothing returned from here can end the
//! connection loop; the worst a bad message causes is an `error` reply or a
//! logged drop.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    domain::{
        MediaState, MediaStateChange, ParticipantConnection, ParticipantName, RoomCode,
        RoomNotifier, RoomRepository, SignalKind, Timestamp,
    },
    infrastructure::{
        broadcast::send_on,
        dto::websocket::{ClientMessage, ParseError, ServerMessage},
    },
    usecase::{
        JoinError, JoinRoomCommand, JoinRoomUseCase, LeaveRoomUseCase, RelaySignalUseCase,
        RoomInfoUseCase, SendChatUseCase, SessionContext, SessionError, UpdateMediaStateUseCase,
    },
};

/// Display name used when a join carries none.
const ANONYMOUS_NAME: &str = "Anonymous";

pub struct SignalingRouter {
    repository: Arc<dyn RoomRepository>,
    notifier: Arc<dyn RoomNotifier>,
}

impl SignalingRouter {
    pub fn new(repository: Arc<dyn RoomRepository>, notifier: Arc<dyn RoomNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Decode and dispatch one text frame.
    pub async fn handle_text(
        &self,
        session: &mut Option<SessionContext>,
        connection: &Arc<dyn ParticipantConnection>,
        text: &str,
    ) {
        match ClientMessage::parse(text) {
            Ok(message) => self.dispatch(session, connection, message).await,
            Err(e @ ParseError::UnknownType(_)) => {
                warn!("{}", e);
                reply(connection, ServerMessage::error(e.to_string()));
            }
            Err(ParseError::Malformed(reason)) => {
                warn!("Dropping malformed message: {}", reason);
            }
        }
    }

    pub async fn dispatch(
        &self,
        session: &mut Option<SessionContext>,
        connection: &Arc<dyn ParticipantConnection>,
        message: ClientMessage,
    ) {
        debug!("Dispatching '{}'", message.kind());
        match message {
            ClientMessage::Join {
                room_code,
                participant_name,
                user_data,
                requested_moderator,
                audio_enabled,
                video_enabled,
            } => {
                let name = participant_name
                    .or_else(|| user_data.and_then(|data| data.name))
                    .unwrap_or_else(|| ANONYMOUS_NAME.to_string());
                let media = MediaState {
                    audio_enabled: audio_enabled.unwrap_or(true),
                    video_enabled: video_enabled.unwrap_or(true),
                    ..MediaState::default()
                };
                if let Err(e) = self
                    .join(session, connection, room_code, name, requested_moderator, media)
                    .await
                {
                    warn!("Join rejected: {}", e);
                    reply(connection, ServerMessage::error(e.to_string()));
                }
            }
            ClientMessage::GetRoomInfo { room_code } => {
                let snapshot = RoomInfoUseCase::new(self.repository.clone())
                    .lookup(&room_code)
                    .await;
                reply(
                    connection,
                    ServerMessage::RoomInfo {
                        room_code,
                        exists: snapshot.is_some(),
                        participant_count: snapshot
                            .as_ref()
                            .map_or(0, |room| room.participant_count()),
                        created_at: snapshot.map(|room| room.created_at.value()),
                    },
                );
            }
            ClientMessage::Ping => reply(
                connection,
                ServerMessage::Pong {
                    timestamp: Timestamp::now().value(),
                },
            ),
            // Only the room binding ends; the socket stays usable for a new join.
            ClientMessage::Leave => match session.take() {
                Some(context) => {
                    LeaveRoomUseCase::new(self.repository.clone(), self.notifier.clone())
                        .execute(&context)
                        .await;
                }
                None => reply(connection, not_joined()),
            },
            other => {
                let Some(context) = session.as_ref() else {
                    debug!("Rejecting '{}' before join", other.kind());
                    reply(connection, not_joined());
                    return;
                };
                if let Err(message) = self.dispatch_in_room(context, other).await {
                    reply(connection, ServerMessage::error(message));
                }
            }
        }
    }

    async fn join(
        &self,
        session: &mut Option<SessionContext>,
        connection: &Arc<dyn ParticipantConnection>,
        room_code: String,
        name: String,
        requested_moderator: Option<bool>,
        media: MediaState,
    ) -> Result<(), JoinError> {
        if let Some(existing) = session.as_ref() {
            return Err(JoinError::AlreadyJoined(existing.room_code.clone()));
        }
        let room_code = RoomCode::new(room_code).map_err(JoinError::InvalidRoomCode)?;
        let joined = JoinRoomUseCase::new(self.repository.clone(), self.notifier.clone())
            .execute(JoinRoomCommand {
                room_code,
                name: ParticipantName::new(name),
                requested_moderator,
                media,
                connection: connection.clone(),
            })
            .await?;
        *session = Some(joined.session);
        Ok(())
    }

    /// Handlers that need an established room context. `Err` carries the
    /// text of the `error` reply.
    async fn dispatch_in_room(
        &self,
        session: &SessionContext,
        message: ClientMessage,
    ) -> Result<(), String> {
        match message {
            ClientMessage::Offer {
                target_participant_id,
                offer,
            } => self.relay(session, &target_participant_id, SignalKind::Offer, offer).await,
            ClientMessage::Answer {
                target_participant_id,
                answer,
            } => {
                self.relay(session, &target_participant_id, SignalKind::Answer, answer)
                    .await
            }
            ClientMessage::IceCandidate {
                target_participant_id,
                candidate,
            } => {
                self.relay(
                    session,
                    &target_participant_id,
                    SignalKind::IceCandidate,
                    candidate,
                )
                .await
            }
            ClientMessage::ChatMessage { message } => {
                SendChatUseCase::new(self.repository.clone(), self.notifier.clone())
                    .execute(session, message)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            }
            ClientMessage::ToggleAudio {
                enabled,
                participant_id,
            } => {
                let changes = [MediaStateChange::Audio(enabled)];
                self.update_media(session, &changes, participant_id).await
            }
            ClientMessage::ToggleVideo {
                enabled,
                participant_id,
            } => {
                let changes = [MediaStateChange::Video(enabled)];
                self.update_media(session, &changes, participant_id).await
            }
            ClientMessage::RaiseHand {
                raised,
                participant_id,
            } => {
                let changes = [MediaStateChange::Hand(raised)];
                self.update_media(session, &changes, participant_id).await
            }
            ClientMessage::ScreenShare {
                enabled,
                participant_id,
            } => {
                let changes = [MediaStateChange::ScreenShare(enabled)];
                self.update_media(session, &changes, participant_id).await
            }
            ClientMessage::MediaStateChanged {
                audio_enabled,
                video_enabled,
                participant_id,
            } => {
                let changes: Vec<_> = audio_enabled
                    .map(MediaStateChange::Audio)
                    .into_iter()
                    .chain(video_enabled.map(MediaStateChange::Video))
                    .collect();
                if changes.is_empty() {
                    debug!("Ignoring media-state-changed without audio or video");
                    return Ok(());
                }
                self.update_media(session, &changes, participant_id).await
            }
            // Handled in `dispatch` before a room context is required.
            ClientMessage::Join { .. }
            | ClientMessage::Leave
            | ClientMessage::GetRoomInfo { .. }
            | ClientMessage::Ping => Ok(()),
        }
    }

    async fn relay(
        &self,
        session: &SessionContext,
        target: &str,
        kind: SignalKind,
        payload: serde_json::Value,
    ) -> Result<(), String> {
        RelaySignalUseCase::new(self.repository.clone(), self.notifier.clone())
            .execute(session, target, kind, payload)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn update_media(
        &self,
        session: &SessionContext,
        changes: &[MediaStateChange],
        claimed_participant_id: Option<String>,
    ) -> Result<(), String> {
        UpdateMediaStateUseCase::new(self.repository.clone(), self.notifier.clone())
            .apply_all(session, changes, claimed_participant_id.as_deref())
            .await
            .map_err(|e| e.to_string())
    }
}

fn not_joined() -> ServerMessage {
    ServerMessage::error(SessionError::NotJoined.to_string())
}

fn reply(connection: &Arc<dyn ParticipantConnection>, message: ServerMessage) {
    if !send_on(connection.as_ref(), &message) {
        debug!("Reply dropped: connection not writable");
    }
}
