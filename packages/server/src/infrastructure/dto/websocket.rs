//! WebSocket message DTOs for the signaling protocol.
//!
//! Every frame is a JSON object with a `type` discriminator. Field names are
//! camelCase on the wire.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    ChatMessage, MediaStateChange, OutboundPayload, ParticipantSnapshot, RoomConfig, RoomEvent,
    SignalKind,
};

/// Every `type` tag accepted from clients, aliases included.
pub const CLIENT_MESSAGE_TYPES: &[&str] = &[
    "join",
    "join-room",
    "leave",
    "leave-room",
    "offer",
    "answer",
    "ice-candidate",
    "chat-message",
    "toggle-audio",
    "toggle-video",
    "raise-hand",
    "screen-share",
    "media-state-changed",
    "get-room-info",
    "room-info-query",
    "ping",
];

/// Why an inbound frame could not be turned into a [`ClientMessage`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not JSON, no string `type`, or a known type with invalid fields
    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("Unsupported message type: {0}")]
    UnknownType(String),
}

/// Legacy identity payload some clients send instead of `participantName`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub name: Option<String>,
}

/// Client-to-server messages
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    #[serde(alias = "join-room", rename_all = "camelCase")]
    Join {
        room_code: String,
        #[serde(default, alias = "userName")]
        participant_name: Option<String>,
        #[serde(default)]
        user_data: Option<UserData>,
        #[serde(default)]
        requested_moderator: Option<bool>,
        #[serde(default)]
        audio_enabled: Option<bool>,
        #[serde(default)]
        video_enabled: Option<bool>,
    },
    #[serde(alias = "leave-room")]
    Leave,
    #[serde(rename_all = "camelCase")]
    Offer {
        #[serde(alias = "targetUserId")]
        target_participant_id: String,
        offer: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    Answer {
        #[serde(alias = "targetUserId")]
        target_participant_id: String,
        answer: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    IceCandidate {
        #[serde(alias = "targetUserId")]
        target_participant_id: String,
        candidate: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    ChatMessage {
        #[serde(alias = "text")]
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    ToggleAudio {
        #[serde(alias = "audioEnabled")]
        enabled: bool,
        #[serde(default)]
        participant_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ToggleVideo {
        #[serde(alias = "videoEnabled")]
        enabled: bool,
        #[serde(default)]
        participant_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    RaiseHand {
        #[serde(alias = "isHandRaised")]
        raised: bool,
        #[serde(default)]
        participant_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ScreenShare {
        enabled: bool,
        #[serde(default)]
        participant_id: Option<String>,
    },
    /// Audio and/or video in one message
    #[serde(rename_all = "camelCase")]
    MediaStateChanged {
        #[serde(default)]
        audio_enabled: Option<bool>,
        #[serde(default)]
        video_enabled: Option<bool>,
        #[serde(default)]
        participant_id: Option<String>,
    },
    #[serde(alias = "room-info-query", rename_all = "camelCase")]
    GetRoomInfo { room_code: String },
    Ping,
}

impl ClientMessage {
    /// Decode one text frame.
    ///
    /// Unknown `type` tags are reported separately from other failures so the
    /// caller can answer them instead of dropping them.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ParseError::Malformed(e.to_string()))?;
        let Some(tag) = value.get("type").and_then(serde_json::Value::as_str) else {
            return Err(ParseError::Malformed(
                "missing string field `type`".to_string(),
            ));
        };
        if !CLIENT_MESSAGE_TYPES.contains(&tag) {
            return Err(ParseError::UnknownType(tag.to_string()));
        }
        serde_json::from_value(value).map_err(|e| ParseError::Malformed(e.to_string()))
    }

    /// Wire name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave => "leave",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice-candidate",
            Self::ChatMessage { .. } => "chat-message",
            Self::ToggleAudio { .. } => "toggle-audio",
            Self::ToggleVideo { .. } => "toggle-video",
            Self::RaiseHand { .. } => "raise-hand",
            Self::ScreenShare { .. } => "screen-share",
            Self::MediaStateChanged { .. } => "media-state-changed",
            Self::GetRoomInfo { .. } => "get-room-info",
            Self::Ping => "ping",
        }
    }
}

/// Participant information shared with other room members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub id: String,
    pub name: String,
    pub audio_enabled: bool,
    pub video_enabled: bool,
    pub is_hand_raised: bool,
    pub is_screen_sharing: bool,
    pub is_moderator: bool,
    /// Unix timestamp (milliseconds)
    pub joined_at: i64,
}

impl From<&ParticipantSnapshot> for ParticipantSummary {
    fn from(p: &ParticipantSnapshot) -> Self {
        Self {
            id: p.id.as_str().to_string(),
            name: p.name.as_str().to_string(),
            audio_enabled: p.media.audio_enabled,
            video_enabled: p.media.video_enabled,
            is_hand_raised: p.media.hand_raised,
            is_screen_sharing: p.media.screen_sharing,
            is_moderator: p.is_moderator,
            joined_at: p.joined_at.value(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfigDto {
    pub enable_chat: bool,
    pub enable_screen_share: bool,
    pub enable_recording: bool,
    pub max_participants: usize,
}

impl From<RoomConfig> for RoomConfigDto {
    fn from(c: RoomConfig) -> Self {
        Self {
            enable_chat: c.enable_chat,
            enable_screen_share: c.enable_screen_share,
            enable_recording: c.enable_recording,
            max_participants: c.max_participants,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: String,
    pub sender_id: String,
    /// Sender's display name at send time
    pub sender: String,
    pub message: String,
    pub timestamp: i64,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(m: &ChatMessage) -> Self {
        Self {
            id: m.id.as_str().to_string(),
            sender_id: m.sender_id.as_str().to_string(),
            sender: m.sender_name.as_str().to_string(),
            message: m.content.as_str().to_string(),
            timestamp: m.timestamp.value(),
        }
    }
}

/// Server-to-client messages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Reply to a successful join
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_code: String,
        participant_id: String,
        is_moderator: bool,
        config: RoomConfigDto,
        /// Everyone already in the room, the joiner excluded
        participants: Vec<ParticipantSummary>,
        chat_history: Vec<ChatMessageDto>,
    },
    ParticipantJoined {
        participant: ParticipantSummary,
    },
    #[serde(rename_all = "camelCase")]
    ParticipantLeft { participant_id: String },
    #[serde(rename_all = "camelCase")]
    Offer {
        sender_participant_id: String,
        offer: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    Answer {
        sender_participant_id: String,
        answer: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    IceCandidate {
        sender_participant_id: String,
        candidate: serde_json::Value,
    },
    ChatMessage(ChatMessageDto),
    #[serde(rename_all = "camelCase")]
    ParticipantAudioChanged {
        participant_id: String,
        audio_enabled: bool,
    },
    #[serde(rename_all = "camelCase")]
    ParticipantVideoChanged {
        participant_id: String,
        video_enabled: bool,
    },
    #[serde(rename_all = "camelCase")]
    ParticipantHandChanged {
        participant_id: String,
        is_hand_raised: bool,
    },
    #[serde(rename_all = "camelCase")]
    ScreenShareChanged {
        participant_id: String,
        enabled: bool,
    },
    #[serde(rename_all = "camelCase")]
    RoomInfo {
        room_code: String,
        exists: bool,
        participant_count: usize,
        created_at: Option<i64>,
    },
    #[serde(rename_all = "camelCase")]
    ModeratorChanged { participant_id: String },
    Pong { timestamp: i64 },
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Serialize once for delivery to any number of connections.
    pub fn to_payload(&self) -> Result<OutboundPayload, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(Arc::from(json))
    }
}

impl From<&RoomEvent> for ServerMessage {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::Joined {
                room_code,
                participant_id,
                is_moderator,
                config,
                participants,
                chat_history,
            } => Self::RoomJoined {
                room_code: room_code.as_str().to_string(),
                participant_id: participant_id.as_str().to_string(),
                is_moderator: *is_moderator,
                config: (*config).into(),
                participants: participants.iter().map(ParticipantSummary::from).collect(),
                chat_history: chat_history.iter().map(ChatMessageDto::from).collect(),
            },
            RoomEvent::ParticipantJoined(participant) => Self::ParticipantJoined {
                participant: participant.into(),
            },
            RoomEvent::ParticipantLeft(id) => Self::ParticipantLeft {
                participant_id: id.as_str().to_string(),
            },
            RoomEvent::Signal {
                kind,
                sender,
                payload,
            } => {
                let sender_participant_id = sender.as_str().to_string();
                let payload = payload.clone();
                match kind {
                    SignalKind::Offer => Self::Offer {
                        sender_participant_id,
                        offer: payload,
                    },
                    SignalKind::Answer => Self::Answer {
                        sender_participant_id,
                        answer: payload,
                    },
                    SignalKind::IceCandidate => Self::IceCandidate {
                        sender_participant_id,
                        candidate: payload,
                    },
                }
            }
            RoomEvent::Chat(message) => Self::ChatMessage(message.into()),
            RoomEvent::MediaChanged {
                participant_id,
                change,
            } => {
                let participant_id = participant_id.as_str().to_string();
                match *change {
                    MediaStateChange::Audio(audio_enabled) => Self::ParticipantAudioChanged {
                        participant_id,
                        audio_enabled,
                    },
                    MediaStateChange::Video(video_enabled) => Self::ParticipantVideoChanged {
                        participant_id,
                        video_enabled,
                    },
                    MediaStateChange::Hand(is_hand_raised) => Self::ParticipantHandChanged {
                        participant_id,
                        is_hand_raised,
                    },
                    MediaStateChange::ScreenShare(enabled) => Self::ScreenShareChanged {
                        participant_id,
                        enabled,
                    },
                }
            }
            RoomEvent::ModeratorChanged(id) => Self::ModeratorChanged {
                participant_id: id.as_str().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_join_with_aliases() {
        // テスト項目: join-room と userData 形式の参加メッセージを解釈できる
        // given (前提条件):
        let text = r#"{"type":"join-room","roomCode":"ABC123","userData":{"name":"Alice"}}"#;

        // when (操作):
        let msg = ClientMessage::parse(text).unwrap();

        // then (期待する結果):
        match msg {
            ClientMessage::Join {
                room_code,
                participant_name,
                user_data,
                requested_moderator,
                ..
            } => {
                assert_eq!(room_code, "ABC123");
                assert_eq!(participant_name, None);
                assert_eq!(user_data.unwrap().name.as_deref(), Some("Alice"));
                assert_eq!(requested_moderator, None);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_offer_keeps_payload_opaque() {
        // テスト項目: offer のペイロードは解釈されずそのまま保持される
        let text = r#"{"type":"offer","targetUserId":"p2","offer":{"sdp":"v=0\r\n","type":"offer","extra":[1,2]}}"#;

        let msg = ClientMessage::parse(text).unwrap();

        match msg {
            ClientMessage::Offer {
                target_participant_id,
                offer,
            } => {
                assert_eq!(target_participant_id, "p2");
                assert_eq!(offer, json!({"sdp":"v=0\r\n","type":"offer","extra":[1,2]}));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_unit_variants() {
        // テスト項目: フィールドを持たないメッセージを解釈できる
        assert!(matches!(
            ClientMessage::parse(r#"{"type":"leave-room"}"#),
            Ok(ClientMessage::Leave)
        ));
        assert!(matches!(
            ClientMessage::parse(r#"{"type":"ping"}"#),
            Ok(ClientMessage::Ping)
        ));
    }

    #[test]
    fn test_parse_unknown_type() {
        // テスト項目: 未知の type はエラー応答用に区別される
        let result = ClientMessage::parse(r#"{"type":"kick-participant","id":"x"}"#);

        assert_eq!(
            result.unwrap_err(),
            ParseError::UnknownType("kick-participant".to_string())
        );
    }

    #[test]
    fn test_parse_malformed() {
        // テスト項目: JSON でない・type がない・必須フィールド欠落は不正メッセージ扱い
        for text in [
            "not json",
            r#"{"roomCode":"ABC"}"#,
            r#"{"type":42}"#,
            r#"{"type":"offer","offer":{}}"#,
            r#"[1,2,3]"#,
        ] {
            assert!(
                matches!(ClientMessage::parse(text), Err(ParseError::Malformed(_))),
                "expected malformed: {text}"
            );
        }
    }

    #[test]
    fn test_every_listed_type_is_parseable() {
        // テスト項目: CLIENT_MESSAGE_TYPES に列挙した type はすべて解釈可能
        let samples = [
            json!({"type":"join","roomCode":"R"}),
            json!({"type":"join-room","roomCode":"R"}),
            json!({"type":"leave"}),
            json!({"type":"leave-room"}),
            json!({"type":"offer","targetParticipantId":"p","offer":null}),
            json!({"type":"answer","targetParticipantId":"p","answer":{}}),
            json!({"type":"ice-candidate","targetParticipantId":"p","candidate":{}}),
            json!({"type":"chat-message","text":"hi"}),
            json!({"type":"toggle-audio","enabled":false}),
            json!({"type":"toggle-video","videoEnabled":true}),
            json!({"type":"raise-hand","isHandRaised":true}),
            json!({"type":"screen-share","enabled":true}),
            json!({"type":"media-state-changed","videoEnabled":false}),
            json!({"type":"get-room-info","roomCode":"R"}),
            json!({"type":"room-info-query","roomCode":"R"}),
            json!({"type":"ping"}),
        ];
        assert_eq!(samples.len(), CLIENT_MESSAGE_TYPES.len());

        for sample in samples {
            let text = sample.to_string();
            assert!(ClientMessage::parse(&text).is_ok(), "failed to parse {text}");
        }
    }

    #[test]
    fn test_server_message_wire_format() {
        // テスト項目: サーバーメッセージが kebab-case の type と camelCase のフィールドで出力される
        // given (前提条件):
        let msg = ServerMessage::ParticipantAudioChanged {
            participant_id: "p1".to_string(),
            audio_enabled: false,
        };

        // when (操作):
        let value: serde_json::Value = serde_json::from_str(&msg.to_payload().unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type":"participant-audio-changed","participantId":"p1","audioEnabled":false})
        );
    }

    #[test]
    fn test_parse_media_state_changed_with_partial_fields() {
        // テスト項目: media-state-changed は音声・映像のどちらか一方だけでも解釈できる
        // given (前提条件):
        let text = r#"{"type":"media-state-changed","audioEnabled":false}"#;

        // when (操作):
        let msg = ClientMessage::parse(text).unwrap();

        // then (期待する結果):
        match msg {
            ClientMessage::MediaStateChanged {
                audio_enabled,
                video_enabled,
                participant_id,
            } => {
                assert_eq!(audio_enabled, Some(false));
                assert_eq!(video_enabled, None);
                assert_eq!(participant_id, None);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_room_event_maps_to_wire_message() {
        // テスト項目: ドメインイベントが対応するサーバーメッセージに変換される
        // given (前提条件):
        let event = RoomEvent::MediaChanged {
            participant_id: crate::domain::ParticipantId::new("p1".to_string()).unwrap(),
            change: MediaStateChange::Hand(true),
        };

        // when (操作):
        let msg = ServerMessage::from(&event);

        // then (期待する結果):
        assert_eq!(
            msg,
            ServerMessage::ParticipantHandChanged {
                participant_id: "p1".to_string(),
                is_hand_raised: true,
            }
        );
    }

    #[test]
    fn test_chat_message_is_flattened() {
        // テスト項目: チャットメッセージは type と同じ階層にフィールドが並ぶ
        let msg = ServerMessage::ChatMessage(ChatMessageDto {
            id: "m1".to_string(),
            sender_id: "p1".to_string(),
            sender: "Alice".to_string(),
            message: "hello".to_string(),
            timestamp: 5,
        });

        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "chat-message");
        assert_eq!(value["sender"], "Alice");
        assert_eq!(value["message"], "hello");
        assert_eq!(value["senderId"], "p1");
    }
}
