//! Session controller for the chat and code panes.
//!
//! Owns both histories and a backend. Blank input is ignored. Nothing on the
//! send path surfaces as an error: transport failures become a client-side
//! apology (chat) or an unrecorded placeholder (code), and failed history
//! writes are logged while the in-memory state carries on. Only the explicit
//! clears report store errors.

use tracing::{info, warn};

use super::backend::AssistantBackend;
use super::chat::{ChatHistory, ChatMessage};
use super::code::{CodeGenerationRecord, CodeHistory, CodeLanguage};
use super::store::{KeyValueStore, StoreError};
use super::{new_id, now_ms};
use crate::error::ErrorCode;
use crate::types::ReplyOrigin;

/// Replaces an empty `content` from the relay.
pub const EMPTY_REPLY_TEXT: &str = "I apologize, but I couldn't generate a response. Please try again.";

/// Chat reply used when the relay cannot be reached.
pub const CONNECTION_ERROR_TEXT: &str =
    "I'm experiencing some technical difficulties connecting to the assistant. Please try again in a moment.";

pub const CLIENT_ERROR_SOURCE: &str = "Error Handler";
pub const CLIENT_ERROR_MODEL: &str = "Fallback";

/// Code result shown when the relay cannot be reached. Never recorded.
pub const CODE_ERROR_ARTIFACT: &str = "// Error: Failed to generate code with the assistant model\n\
// Please try again with a more specific request\n\nconsole.log('Code generation failed');";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Connected,
    Error,
}

impl ConnectionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }
}

impl From<ReplyOrigin> for ConnectionStatus {
    fn from(origin: ReplyOrigin) -> Self {
        match origin {
            ReplyOrigin::Real => Self::Connected,
            ReplyOrigin::Fallback => Self::Error,
        }
    }
}

pub struct AssistantSession<B, S> {
    backend: B,
    chat: ChatHistory<S>,
    code: CodeHistory<S>,
    status: ConnectionStatus,
    current_code: Option<CodeGenerationRecord>,
}

impl<B, S> AssistantSession<B, S>
where
    B: AssistantBackend,
    S: KeyValueStore + Clone,
{
    /// Restore both histories from `store`.
    pub fn load(backend: B, store: S) -> Self {
        Self {
            backend,
            chat: ChatHistory::load(store.clone()),
            code: CodeHistory::load(store),
            status: ConnectionStatus::Unknown,
            current_code: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    #[must_use]
    pub fn chat_messages(&self) -> &[ChatMessage] {
        self.chat.messages()
    }

    #[must_use]
    pub fn code_history(&self) -> &[CodeGenerationRecord] {
        self.code.entries()
    }

    /// Result of the most recent code request, including an unrecorded error artifact.
    #[must_use]
    pub fn current_code(&self) -> Option<&CodeGenerationRecord> {
        self.current_code.as_ref()
    }

    /// Send `input` with the full transcript and append the reply.
    ///
    /// Returns the appended assistant message, or `None` for blank input.
    pub async fn send_chat(&mut self, input: &str) -> Option<ChatMessage> {
        let content = input.trim();
        if content.is_empty() {
            return None;
        }

        log_store_failure(self.chat.push(ChatMessage::user(content)));
        let transcript = self.chat.transcript();

        let reply = match self.backend.chat(&transcript).await {
            Ok(reply) => {
                self.status = reply.origin.into();
                info!(turns = transcript.len(), status = self.status.as_str(), "session: chat reply");
                let text = if reply.content.trim().is_empty() { EMPTY_REPLY_TEXT.to_owned() } else { reply.content };
                ChatMessage::assistant(text, reply.source, reply.model)
            }
            Err(e) => {
                warn!(error = %e, "session: chat request failed");
                self.status = ConnectionStatus::Error;
                ChatMessage::assistant(
                    CONNECTION_ERROR_TEXT,
                    Some(CLIENT_ERROR_SOURCE.to_owned()),
                    Some(CLIENT_ERROR_MODEL.to_owned()),
                )
            }
        };

        log_store_failure(self.chat.push(reply.clone()));
        Some(reply)
    }

    /// Request code for `input`. Successful replies, fallback placeholders
    /// included, are recorded in the code history.
    ///
    /// Returns the current result, or `None` for blank input.
    pub async fn generate_code(&mut self, input: &str) -> Option<CodeGenerationRecord> {
        let prompt = input.trim();
        if prompt.is_empty() {
            return None;
        }

        let record = match self.backend.generate_code(prompt).await {
            Ok(reply) => {
                let record = CodeGenerationRecord::new(prompt, reply.code);
                info!(language = %record.language, origin = ?reply.origin, "session: code reply");
                log_store_failure(self.code.record(record.clone()));
                record
            }
            Err(e) => {
                warn!(error = %e, "session: code request failed");
                CodeGenerationRecord {
                    id: new_id(),
                    prompt: prompt.to_owned(),
                    code: CODE_ERROR_ARTIFACT.to_owned(),
                    language: CodeLanguage::Javascript,
                    created_at: now_ms(),
                }
            }
        };

        self.current_code = Some(record.clone());
        Some(record)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the persisted chat cannot be removed.
    pub fn clear_chat(&mut self) -> Result<(), StoreError> {
        self.status = ConnectionStatus::Unknown;
        self.chat.clear()
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the persisted code history cannot be removed.
    pub fn clear_code(&mut self) -> Result<(), StoreError> {
        self.current_code = None;
        self.code.clear()
    }
}

fn log_store_failure(result: Result<(), StoreError>) {
    if let Err(e) = result {
        warn!(code = e.error_code(), error = %e, "session: history write failed, keeping in-memory state");
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
