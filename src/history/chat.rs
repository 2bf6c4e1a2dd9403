//! Persisted chat transcript.

use serde::{Deserialize, Serialize};

use super::store::{KeyValueStore, StoreError, load_json, save_json};
use super::{new_id, now_ms};
use crate::types::{ConversationTurn, Role};

pub const CHAT_HISTORY_KEY: &str = "chat-history";

/// One rendered chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { id: new_id(), role: Role::User, content: content.into(), created_at: now_ms(), source: None, model: None }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>, source: Option<String>, model: Option<String>) -> Self {
        Self { id: new_id(), role: Role::Assistant, content: content.into(), created_at: now_ms(), source, model }
    }

    #[must_use]
    pub fn turn(&self) -> ConversationTurn {
        ConversationTurn::new(self.role, self.content.clone())
    }
}

/// Ordered chat messages, oldest first, written through to `S` on every change.
#[derive(Debug)]
pub struct ChatHistory<S> {
    store: S,
    messages: Vec<ChatMessage>,
}

impl<S: KeyValueStore> ChatHistory<S> {
    /// Load the persisted history. A missing or malformed value starts empty.
    pub fn load(store: S) -> Self {
        let messages = load_json(&store, CHAT_HISTORY_KEY).unwrap_or_default();
        Self { store, messages }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Role/content pairs for the full transcript, oldest first.
    #[must_use]
    pub fn transcript(&self) -> Vec<ConversationTurn> {
        self.messages.iter().map(ChatMessage::turn).collect()
    }

    /// Append a message and persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails. The in-memory append
    /// still happened.
    pub fn push(&mut self, message: ChatMessage) -> Result<(), StoreError> {
        self.messages.push(message);
        save_json(&self.store, CHAT_HISTORY_KEY, &self.messages)
    }

    /// Drop every message and remove the persisted copy.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the key cannot be removed.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.messages.clear();
        self.store.remove(CHAT_HISTORY_KEY)
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
