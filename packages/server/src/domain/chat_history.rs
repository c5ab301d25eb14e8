//! Bounded per-room chat log.

use std::collections::VecDeque;

use super::entity::ChatMessage;

/// Default number of chat messages kept per room.
pub const DEFAULT_CHAT_HISTORY_CAPACITY: usize = 100;

/// FIFO ring buffer of chat messages.
///
/// Once `capacity` messages are stored, every push evicts exactly the oldest
/// one.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl ChatHistory {
    /// Create an empty history. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, returning the evicted one if the buffer was full.
    pub fn push(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        let evicted = if self.messages.len() >= self.capacity {
            self.messages.pop_front()
        } else {
            None
        };
        self.messages.push_back(message);
        evicted
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CHAT_HISTORY_CAPACITY)
    }
}
