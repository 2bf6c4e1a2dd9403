//! Wire types shared by the HTTP routes and the client backend.

use serde::{Deserialize, Serialize};

/// `source` label attached to every degraded response.
pub const FALLBACK_SOURCE: &str = "Fallback Response";

/// `model` label attached to every degraded response.
pub const FALLBACK_MODEL: &str = "Error Handler";

/// `model` label attached to genuine model output.
pub const REAL_MODEL: &str = "Real AI Model";

// =============================================================================
// CONVERSATION
// =============================================================================

/// Speaker of a conversation turn. Any role other than `user` reads as
/// `assistant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(other)]
    Assistant,
}

impl Role {
    /// Label used for this role inside a rendered prompt.
    #[must_use]
    pub fn prompt_label(self) -> &'static str {
        match self {
            Self::User => "Human",
            Self::Assistant => "Assistant",
        }
    }
}

/// One turn of a transcript. Oldest turns come first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

// =============================================================================
// REPLIES
// =============================================================================

/// Whether a reply came from the model or was synthesized after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyOrigin {
    Real,
    #[default]
    Fallback,
}

/// `POST /chat` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ConversationTurn>,
}

/// `POST /chat` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub origin: ReplyOrigin,
}

/// `POST /generate-code` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRequest {
    pub prompt: String,
}

/// `POST /generate-code` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeReply {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub origin: ReplyOrigin,
}
