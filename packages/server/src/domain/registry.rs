//! In-memory mapping from room code to room state.

use std::collections::HashMap;

use super::{
    chat_history::DEFAULT_CHAT_HISTORY_CAPACITY,
    entity::{Room, RoomConfig},
    value_object::{RoomCode, Timestamp},
};

/// Registry of live rooms.
///
/// Rooms are created lazily by [`RoomRegistry::get_or_create`] and removed by
/// their callers once empty. The registry itself holds no lock; the owner
/// decides how access is serialized.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    default_config: RoomConfig,
    history_capacity: usize,
}

impl RoomRegistry {
    pub fn new(default_config: RoomConfig) -> Self {
        Self::with_history_capacity(default_config, DEFAULT_CHAT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(default_config: RoomConfig, history_capacity: usize) -> Self {
        Self {
            rooms: HashMap::new(),
            default_config,
            history_capacity,
        }
    }

    /// Return the room for `code`, creating it with the default config if absent.
    ///
    /// The boolean is `true` when this call created the room.
    pub fn get_or_create(&mut self, code: &RoomCode, now: Timestamp) -> (&mut Room, bool) {
        let mut created = false;
        let room = self.rooms.entry(code.clone()).or_insert_with(|| {
            created = true;
            Room::with_history_capacity(
                code.clone(),
                self.default_config,
                now,
                self.history_capacity,
            )
        });
        (room, created)
    }

    /// Read-only lookup; never creates.
    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Remove a room unconditionally.
    pub fn remove(&mut self, code: &RoomCode) -> Option<Room> {
        self.rooms.remove(code)
    }

    /// Remove every room without participants, returning their codes.
    pub fn remove_empty_rooms(&mut self) -> Vec<RoomCode> {
        let empty: Vec<RoomCode> = self
            .rooms
            .values()
            .filter(|room| room.is_empty())
            .map(|room| room.code.clone())
            .collect();
        for code in &empty {
            self.rooms.remove(code);
        }
        empty
    }

    /// Codes of all rooms, in no particular order.
    pub fn codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().cloned().collect()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Total number of participants across all rooms.
    pub fn participant_count(&self) -> usize {
        self.rooms.values().map(Room::len).sum()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{participant, room_code};

    #[test]
    fn test_get_or_create_is_idempotent() {
        // テスト項目: 同じコードで 2 回呼んでもルームは 1 つだけ作成される
        // given (前提条件):
        let mut registry = RoomRegistry::default();
        let code = room_code("ABC123");

        // when (操作):
        let (_, first) = registry.get_or_create(&code, Timestamp::new(1000));
        let (room, second) = registry.get_or_create(&code, Timestamp::new(2000));

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(room.created_at, Timestamp::new(1000));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_never_creates() {
        // テスト項目: get は存在しないルームを作成しない
        let registry = RoomRegistry::default();

        assert!(registry.get(&room_code("NOPE")).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_new_rooms_use_default_config() {
        // テスト項目: 新規ルームにはレジストリのデフォルト設定が適用される
        let config = RoomConfig {
            enable_chat: false,
            max_participants: 3,
            ..RoomConfig::default()
        };
        let mut registry = RoomRegistry::with_history_capacity(config, 10);

        let (room, _) = registry.get_or_create(&room_code("ABC123"), Timestamp::new(0));

        assert_eq!(room.config, config);
        assert_eq!(room.chat_history.capacity(), 10);
    }

    #[test]
    fn test_remove_empty_rooms() {
        // テスト項目: 参加者がいないルームだけが削除される
        // given (前提条件):
        let mut registry = RoomRegistry::default();
        registry.get_or_create(&room_code("EMPTY"), Timestamp::new(0));
        let (busy, _) = registry.get_or_create(&room_code("BUSY"), Timestamp::new(0));
        busy.add_participant(participant("alice", 1)).unwrap();

        // when (操作):
        let removed = registry.remove_empty_rooms();

        // then (期待する結果):
        assert_eq!(removed, vec![room_code("EMPTY")]);
        assert!(registry.get(&room_code("BUSY")).is_some());
        assert_eq!(registry.participant_count(), 1);
    }

    #[test]
    fn test_codes_lists_every_room() {
        // テスト項目: codes は全ルームのコードを返し、ルームを作成しない
        // given (前提条件):
        let mut registry = RoomRegistry::default();
        registry.get_or_create(&room_code("ROOM-B"), Timestamp::new(0));
        registry.get_or_create(&room_code("ROOM-A"), Timestamp::new(0));

        // when (操作):
        let mut codes = registry.codes();
        codes.sort();

        // then (期待する結果):
        assert_eq!(codes, vec![room_code("ROOM-A"), room_code("ROOM-B")]);
        assert_eq!(registry.len(), 2);
    }
}
