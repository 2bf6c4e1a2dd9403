//! assistant-relay: chat and code-generation relay for a hosted prediction API.
//!
//! ARCHITECTURE
//! ============
//! Server side: `routes` → `services::generation` → `llm` (submit + poll)
//! → normalize or fall back. Client side: `history` holds the chat and code
//! histories behind a key/value store and talks to the server through
//! `history::backend`.

pub mod error;
pub mod history;
pub mod llm;
pub mod routes;
pub mod services;
pub mod state;
pub mod types;
