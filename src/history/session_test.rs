use super::*;
use crate::history::backend::BackendError;
use crate::history::code::CODE_HISTORY_KEY;
use crate::history::store::{MemoryStore, StoreError};
use crate::types::{ChatReply, CodeReply, ConversationTurn, FALLBACK_MODEL, FALLBACK_SOURCE, Role};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// =========================================================================
// MockBackend
// =========================================================================

#[derive(Default)]
struct MockBackend {
    chat_replies: Mutex<VecDeque<Result<ChatReply, BackendError>>>,
    code_replies: Mutex<VecDeque<Result<CodeReply, BackendError>>>,
    transcripts: Arc<Mutex<Vec<Vec<ConversationTurn>>>>,
}

impl MockBackend {
    fn with_chat(self, reply: Result<ChatReply, BackendError>) -> Self {
        self.chat_replies.lock().unwrap().push_back(reply);
        self
    }

    fn with_code(self, reply: Result<CodeReply, BackendError>) -> Self {
        self.code_replies.lock().unwrap().push_back(reply);
        self
    }
}

#[async_trait]
impl AssistantBackend for MockBackend {
    async fn chat(&self, messages: &[ConversationTurn]) -> Result<ChatReply, BackendError> {
        self.transcripts.lock().unwrap().push(messages.to_vec());
        self.chat_replies.lock().unwrap().pop_front().expect("unexpected chat call")
    }

    async fn generate_code(&self, _prompt: &str) -> Result<CodeReply, BackendError> {
        self.code_replies.lock().unwrap().pop_front().expect("unexpected code call")
    }
}

fn real_chat(content: &str) -> ChatReply {
    ChatReply {
        content: content.into(),
        source: Some("IBM Granite 3.3 8B Instruct".into()),
        model: Some("Real AI Model".into()),
        origin: ReplyOrigin::Real,
    }
}

fn fallback_chat() -> ChatReply {
    ChatReply {
        content: "service is busy".into(),
        source: Some(FALLBACK_SOURCE.into()),
        model: Some(FALLBACK_MODEL.into()),
        origin: ReplyOrigin::Fallback,
    }
}

fn code_reply(code: &str) -> CodeReply {
    CodeReply { code: code.into(), source: None, model: None, origin: ReplyOrigin::Real }
}

/// Store whose writes always fail; reads and removes succeed on an empty map.
#[derive(Clone, Default)]
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("read-only")))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

fn transport_error() -> BackendError {
    BackendError::Status { status: 502, body: "bad gateway".into() }
}

// =========================================================================
// Chat
// =========================================================================

#[tokio::test]
async fn send_chat_appends_both_turns_and_marks_connected() {
    let store = MemoryStore::new();
    let mut session = AssistantSession::load(MockBackend::default().with_chat(Ok(real_chat("hello back"))), store.clone());

    let reply = session.send_chat("  hello  ").await.unwrap();

    assert_eq!(reply.content, "hello back");
    assert_eq!(reply.source.as_deref(), Some("IBM Granite 3.3 8B Instruct"));
    assert_eq!(session.status(), ConnectionStatus::Connected);
    let messages = session.chat_messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "hello");
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(ChatHistory::load(store).len(), 2);
}

#[tokio::test]
async fn send_chat_sends_full_transcript() {
    let backend = MockBackend::default().with_chat(Ok(real_chat("one"))).with_chat(Ok(real_chat("two")));
    let transcripts = backend.transcripts.clone();
    let mut session = AssistantSession::load(backend, MemoryStore::new());

    session.send_chat("first").await.unwrap();
    session.send_chat("second").await.unwrap();

    let sent = transcripts.lock().unwrap();
    assert_eq!(sent[0], vec![ConversationTurn::new(Role::User, "first")]);
    assert_eq!(
        sent[1],
        vec![
            ConversationTurn::new(Role::User, "first"),
            ConversationTurn::new(Role::Assistant, "one"),
            ConversationTurn::new(Role::User, "second"),
        ]
    );
}

#[tokio::test]
async fn blank_chat_input_is_ignored() {
    let mut session = AssistantSession::load(MockBackend::default(), MemoryStore::new());
    assert!(session.send_chat("   ").await.is_none());
    assert!(session.chat_messages().is_empty());
}

#[tokio::test]
async fn empty_reply_content_is_replaced() {
    let mut session = AssistantSession::load(MockBackend::default().with_chat(Ok(real_chat(""))), MemoryStore::new());
    let reply = session.send_chat("hi").await.unwrap();
    assert_eq!(reply.content, EMPTY_REPLY_TEXT);
}

#[tokio::test]
async fn fallback_reply_marks_error_status() {
    let mut session = AssistantSession::load(MockBackend::default().with_chat(Ok(fallback_chat())), MemoryStore::new());
    let reply = session.send_chat("hi").await.unwrap();

    assert_eq!(session.status(), ConnectionStatus::Error);
    assert_eq!(reply.model.as_deref(), Some(FALLBACK_MODEL));
}

#[tokio::test]
async fn transport_error_appends_client_apology() {
    let mut session = AssistantSession::load(MockBackend::default().with_chat(Err(transport_error())), MemoryStore::new());
    let reply = session.send_chat("hi").await.unwrap();

    assert_eq!(reply.content, CONNECTION_ERROR_TEXT);
    assert_eq!(reply.source.as_deref(), Some(CLIENT_ERROR_SOURCE));
    assert_eq!(reply.model.as_deref(), Some(CLIENT_ERROR_MODEL));
    assert_eq!(session.status(), ConnectionStatus::Error);
    assert_eq!(session.chat_messages().len(), 2);
}

#[tokio::test]
async fn clear_chat_resets_status_and_storage() {
    let store = MemoryStore::new();
    let mut session = AssistantSession::load(MockBackend::default().with_chat(Ok(real_chat("x"))), store.clone());
    session.send_chat("hi").await.unwrap();

    session.clear_chat().unwrap();

    assert_eq!(session.status(), ConnectionStatus::Unknown);
    assert!(session.chat_messages().is_empty());
    assert!(ChatHistory::load(store).is_empty());
}

#[tokio::test]
async fn failed_chat_write_still_sends_and_appends_reply() {
    let backend = MockBackend::default().with_chat(Ok(real_chat("still here")));
    let transcripts = backend.transcripts.clone();
    let mut session = AssistantSession::load(backend, ReadOnlyStore);

    let reply = session.send_chat("hi").await.unwrap();

    assert_eq!(reply.content, "still here");
    assert_eq!(transcripts.lock().unwrap().len(), 1);
    let roles: Vec<Role> = session.chat_messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    assert_eq!(session.status(), ConnectionStatus::Connected);
}

// =========================================================================
// Code
// =========================================================================

#[tokio::test]
async fn generate_code_records_detected_language() {
    let store = MemoryStore::new();
    let mut session = AssistantSession::load(MockBackend::default().with_code(Ok(code_reply("def f():\n    pass"))), store.clone());

    let record = session.generate_code(" make f ").await.unwrap();

    assert_eq!(record.prompt, "make f");
    assert_eq!(record.language, CodeLanguage::Python);
    assert_eq!(session.current_code(), Some(&record));
    assert_eq!(session.code_history().len(), 1);
    assert_eq!(CodeHistory::load(store).len(), 1);
}

#[tokio::test]
async fn code_transport_error_returns_unrecorded_artifact() {
    let store = MemoryStore::new();
    let mut session = AssistantSession::load(MockBackend::default().with_code(Err(transport_error())), store.clone());

    let record = session.generate_code("make f").await.unwrap();

    assert_eq!(record.code, CODE_ERROR_ARTIFACT);
    assert_eq!(record.language, CodeLanguage::Javascript);
    assert!(session.code_history().is_empty());
    assert_eq!(store.get(CODE_HISTORY_KEY).unwrap(), None);
    assert!(session.current_code().is_some());
}

#[tokio::test]
async fn blank_code_input_is_ignored() {
    let mut session = AssistantSession::load(MockBackend::default(), MemoryStore::new());
    assert!(session.generate_code("\n\t").await.is_none());
    assert!(session.current_code().is_none());
}

#[tokio::test]
async fn clear_code_drops_current_result() {
    let store = MemoryStore::new();
    let mut session = AssistantSession::load(MockBackend::default().with_code(Ok(code_reply("SELECT 1"))), store.clone());
    session.generate_code("one").await.unwrap();

    session.clear_code().unwrap();

    assert!(session.current_code().is_none());
    assert!(session.code_history().is_empty());
    assert!(CodeHistory::load(store).is_empty());
}

#[tokio::test]
async fn session_reload_restores_both_histories() {
    let store = MemoryStore::new();
    let backend = MockBackend::default().with_chat(Ok(real_chat("a"))).with_code(Ok(code_reply("<html></html>")));
    let mut session = AssistantSession::load(backend, store.clone());
    session.send_chat("q").await.unwrap();
    session.generate_code("page").await.unwrap();

    let restored = AssistantSession::load(MockBackend::default(), store);
    assert_eq!(restored.chat_messages().len(), 2);
    assert_eq!(restored.code_history()[0].language, CodeLanguage::Html);
    assert_eq!(restored.status(), ConnectionStatus::Unknown);
    assert!(restored.current_code().is_none());
}

#[tokio::test]
async fn failed_code_write_still_returns_current_result() {
    let backend = MockBackend::default().with_code(Ok(code_reply("SELECT 1")));
    let mut session = AssistantSession::load(backend, ReadOnlyStore);

    let record = session.generate_code("one").await.unwrap();

    assert_eq!(record.code, "SELECT 1");
    assert_eq!(session.current_code(), Some(&record));
    assert_eq!(session.code_history().len(), 1);
}
