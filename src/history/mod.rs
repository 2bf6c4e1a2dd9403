//! Client-side assistant state: chat and code histories, their persistence,
//! and the session controller that drives the relay over HTTP.
//!
//! DESIGN
//! ======
//! Histories are append-only apart from an explicit clear. Every mutation is
//! written through to a [`store::KeyValueStore`] as one JSON array per key,
//! and a clear removes the key outright.

pub mod backend;
pub mod chat;
pub mod code;
pub mod session;
pub mod store;

use std::time::{SystemTime, UNIX_EPOCH};

pub use backend::{AssistantBackend, BackendError, HttpBackend};
pub use chat::{ChatHistory, ChatMessage};
pub use code::{CodeGenerationRecord, CodeHistory, CodeLanguage, detect_language};
pub use session::{AssistantSession, ConnectionStatus};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

/// Milliseconds since the Unix epoch; zero if the clock is before it.
pub(crate) fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
