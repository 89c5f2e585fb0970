//! Append-only conversation store
//!
//! Holds one session's messages in conversation order. Entries are never
//! edited or reordered; the only way to shrink the store is `reset`, which
//! returns it to its seeded state (empty, or the single system message).

use super::message::{Message, Role};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationStore {
    seed: Option<Message>,
    messages: Vec<Message>,
}

impl ConversationStore {
    /// Create an empty store with no seed
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that starts (and resets) with one system message
    pub fn seeded(system_prompt: impl Into<String>) -> Self {
        let seed = Message::system(system_prompt);
        Self {
            messages: vec![seed.clone()],
            seed: Some(seed),
        }
    }

    /// Add a message at the end
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in order, including the seed
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// Messages meant for display (system messages skipped)
    pub fn transcript(&self) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|m| m.role().is_visible())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Size of the store right after creation or reset
    pub fn seeded_len(&self) -> usize {
        usize::from(self.seed.is_some())
    }

    /// Role of the most recent message, if any
    pub fn last_role(&self) -> Option<Role> {
        self.messages.last().map(Message::role)
    }

    /// Drop everything except the seed
    pub fn reset(&mut self) {
        self.messages.clear();
        if let Some(seed) = &self.seed {
            self.messages.push(seed.clone());
        }
    }
}
