//! Domain factories for server-generated identifiers.

use super::{ChatMessageId, ParticipantId, error::ValueObjectError};

/// Factory for generating ParticipantId instances.
///
/// Participant ids are always assigned by the server, never taken from the
/// client.
pub struct ParticipantIdFactory;

impl ParticipantIdFactory {
    /// Generate a new ParticipantId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<ParticipantId, ValueObjectError> {
        ParticipantId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Factory for generating ChatMessageId instances.
pub struct ChatMessageIdFactory;

impl ChatMessageIdFactory {
    pub fn generate() -> ChatMessageId {
        ChatMessageId::new(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_factory_generate() {
        // テスト項目: UUID v4 形式の ParticipantId を生成できる
        // when (操作):
        let result = ParticipantIdFactory::generate();

        // then (期待する結果):
        let id = result.unwrap();
        assert_eq!(id.as_str().len(), 36); // UUID v4 の標準長（ハイフン含む）
    }

    #[test]
    fn test_factories_generate_unique_ids() {
        // テスト項目: 毎回異なる ID を生成する
        assert_ne!(
            ParticipantIdFactory::generate().unwrap(),
            ParticipantIdFactory::generate().unwrap()
        );
        assert_ne!(
            ChatMessageIdFactory::generate(),
            ChatMessageIdFactory::generate()
        );
    }
}
