use std::sync::Arc;

use slidechat_core::models::chat_history::{ChatMessage, ChatSession};
use slidechat_core::models::slide::{Layout, Slide, SlideDocument};
use slidechat_core::title::DEFAULT_SESSION_TITLE;
use slidechat_storage::backend::{FileBackend, MemoryBackend};
use slidechat_storage::sessions::{SESSIONS_KEY, SessionStore};

fn deck(titles: &[&str]) -> SlideDocument {
    titles
        .iter()
        .map(|t| Slide::new(*t, vec![format!("about {t}")], Layout::TitleContent))
        .collect::<Vec<_>>()
        .into()
}

async fn open_memory() -> (Arc<MemoryBackend>, SessionStore) {
    let backend = Arc::new(MemoryBackend::new());
    let store = SessionStore::open(backend.clone()).await;
    (backend, store)
}

#[tokio::test]
async fn first_use_creates_single_default_session() {
    let (backend, store) = open_memory().await;

    let sessions = store.list_sessions().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].title, DEFAULT_SESSION_TITLE);
    assert!(sessions[0].messages.is_empty());

    let current = store.get_current_session().await.unwrap();
    assert_eq!(current.id, sessions[0].id);
    assert!(backend.raw(SESSIONS_KEY).is_some());
}

#[tokio::test]
async fn create_then_append_round_trips_through_list() {
    let (_, store) = open_memory().await;

    let created = store.create_session(Some("Roadmap".to_string())).await;
    let msg = ChatMessage::user("Plan the roadmap deck");
    store.append_message(msg.clone(), None).await;

    let sessions = store.list_sessions().await;
    let session = sessions.iter().find(|s| s.id == created.id).unwrap();
    assert_eq!(session.title, "Roadmap");
    assert_eq!(session.messages, vec![msg]);
    assert_eq!(sessions[0].id, created.id, "new sessions go to the front");
}

#[tokio::test]
async fn untitled_session_takes_title_from_first_user_message() {
    let (_, store) = open_memory().await;

    store.create_session(None).await;
    let updated = store
        .append_message(ChatMessage::user("Slides on medieval castles please"), None)
        .await;
    assert_eq!(updated.title, "Slides on medieval castles please");

    let updated = store
        .append_message(ChatMessage::user("Actually about modern bridges"), None)
        .await;
    assert_eq!(updated.title, "Slides on medieval castles please");
}

#[tokio::test]
async fn list_is_idempotent_without_mutation() {
    let (_, store) = open_memory().await;
    store.create_session(None).await;
    store.append_message(ChatMessage::user("hello"), None).await;

    assert_eq!(store.list_sessions().await, store.list_sessions().await);
}

#[tokio::test]
async fn append_without_current_session_creates_one() {
    let (_, store) = open_memory().await;
    let default = store.get_current_session().await.unwrap();
    store.delete_session(default.id).await;
    assert!(store.get_current_session().await.is_none());

    let session = store
        .append_message(ChatMessage::user("A talk about sourdough baking at home"), None)
        .await;

    assert_eq!(session.title, "A talk about sourdough baking");
    assert_eq!(session.messages.len(), 1);
    assert_eq!(store.get_current_session().await.unwrap().id, session.id);
}

#[tokio::test]
async fn snapshot_attaches_only_to_assistant_messages() {
    let (_, store) = open_memory().await;

    let session = store
        .append_message(ChatMessage::user("make slides"), Some(deck(&["ignored"])))
        .await;
    assert!(session.messages[0].slides().is_none());

    let session = store
        .append_message(ChatMessage::assistant("Here you go", None), Some(deck(&["A", "B"])))
        .await;
    assert_eq!(session.messages[1].slides().unwrap().len(), 2);
    assert_eq!(store.current_document().await.unwrap().len(), 2);
}

#[tokio::test]
async fn attach_replaces_last_assistant_document() {
    let (_, store) = open_memory().await;
    store.append_message(ChatMessage::user("deck"), None).await;
    store
        .append_message(ChatMessage::assistant("done", None), Some(deck(&["A"])))
        .await;

    assert!(store.attach_document_to_last_assistant_message(deck(&["Edited"])).await);
    let doc = store.current_document().await.unwrap();
    assert_eq!(doc.slides()[0].title, "Edited");
}

#[tokio::test]
async fn attach_is_noop_when_last_message_is_from_user() {
    let (_, store) = open_memory().await;
    store
        .append_message(ChatMessage::assistant("done", None), Some(deck(&["A"])))
        .await;
    store.append_message(ChatMessage::user("more"), None).await;
    let before = store.get_current_session().await.unwrap();

    assert!(!store.attach_document_to_last_assistant_message(deck(&["B"])).await);
    assert_eq!(store.get_current_session().await.unwrap(), before);
}

#[tokio::test]
async fn set_current_to_unknown_id_is_lazy_noop() {
    let (_, store) = open_memory().await;
    store.set_current_session(uuid::Uuid::new_v4()).await;
    assert!(store.get_current_session().await.is_none());
    assert_eq!(store.list_sessions().await.len(), 1);
}

#[tokio::test]
async fn deleting_current_moves_to_front() {
    let (_, store) = open_memory().await;
    let older = store.create_session(Some("older".to_string())).await;
    let newer = store.create_session(Some("newer".to_string())).await;

    store.set_current_session(older.id).await;
    store.delete_session(older.id).await;

    let current = store.get_current_session().await.unwrap();
    assert_eq!(current.id, newer.id);
}

#[tokio::test]
async fn deleting_last_session_leaves_no_current() {
    let (_, store) = open_memory().await;
    let only = store.get_current_session().await.unwrap();
    store.delete_session(only.id).await;

    assert!(store.list_sessions().await.is_empty());
    assert!(store.get_current_session().await.is_none());
}

#[tokio::test]
async fn clear_all_recreates_default_session() {
    let (_, store) = open_memory().await;
    store.create_session(Some("a".to_string())).await;
    store.create_session(Some("b".to_string())).await;

    store.clear_all().await;

    let sessions = store.list_sessions().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].title, DEFAULT_SESSION_TITLE);
    assert_eq!(store.get_current_session().await.unwrap().id, sessions[0].id);
}

#[tokio::test]
async fn rename_locks_title() {
    let (_, store) = open_memory().await;
    let session = store.get_current_session().await.unwrap();
    assert!(store.rename_session(session.id, "Board meeting".to_string()).await);

    let updated = store
        .append_message(ChatMessage::user("Summarize the quarter"), None)
        .await;
    assert_eq!(updated.title, "Board meeting");
    assert!(!store.rename_session(uuid::Uuid::new_v4(), "x".to_string()).await);
}

#[tokio::test]
async fn append_bumps_updated_at() {
    let (_, store) = open_memory().await;
    let before = store.get_current_session().await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let after = store.append_message(ChatMessage::user("hi"), None).await;
    assert!(after.updated_at > before.updated_at);
    assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn corrupt_state_lists_as_empty_and_never_errors() {
    let backend = Arc::new(MemoryBackend::new());
    let store = SessionStore::open(backend.clone()).await;
    store.append_message(ChatMessage::user("hi"), None).await;

    backend.insert_raw(SESSIONS_KEY, "{not json");
    assert!(store.list_sessions().await.is_empty());

    // Mutations keep working from the in-memory copy and repair the blob.
    let session = store.append_message(ChatMessage::user("again"), None).await;
    assert_eq!(session.messages.len(), 2);
    assert_eq!(store.list_sessions().await.len(), 1);
}

#[tokio::test]
async fn failed_writes_degrade_to_in_memory_state() {
    let backend = Arc::new(MemoryBackend::new());
    let store = SessionStore::open(backend.clone()).await;
    let persisted = backend.raw(SESSIONS_KEY).unwrap();

    backend.set_fail_writes(true);
    let session = store.append_message(ChatMessage::user("offline"), None).await;
    assert_eq!(session.messages.len(), 1);
    assert_eq!(backend.raw(SESSIONS_KEY).unwrap(), persisted);
}

#[tokio::test]
async fn unsaved_messages_survive_later_reads_and_are_saved_by_next_write() {
    let backend = Arc::new(MemoryBackend::new());
    let store = SessionStore::open(backend.clone()).await;

    backend.set_fail_writes(true);
    store.append_message(ChatMessage::user("offline"), None).await;

    let current = store.get_current_session().await.unwrap();
    assert_eq!(current.messages.len(), 1);
    assert_eq!(store.list_sessions().await[0].messages.len(), 1);

    backend.set_fail_writes(false);
    let session = store
        .append_message(ChatMessage::assistant("reply", None), Some(deck(&["A"])))
        .await;
    let roles: Vec<bool> = session.messages.iter().map(|m| m.is_user()).collect();
    assert_eq!(roles, vec![true, false]);

    let persisted: Vec<ChatSession> =
        serde_json::from_slice(&backend.raw(SESSIONS_KEY).unwrap()).unwrap();
    assert_eq!(persisted[0].messages.len(), 2);
}

#[tokio::test]
async fn append_to_named_session_ignores_current_pointer() {
    let (_, store) = open_memory().await;
    let asking = store.create_session(None).await;
    store.append_message(ChatMessage::user("Deck on owls"), None).await;
    let other = store.create_session(None).await;

    let updated = store
        .append_message_to(asking.id, ChatMessage::assistant("done", None), Some(deck(&["Owls"])))
        .await
        .unwrap();
    assert_eq!(updated.id, asking.id);
    assert_eq!(updated.messages.len(), 2);
    assert_eq!(updated.current_document().unwrap().slides()[0].title, "Owls");

    let current = store.get_current_session().await.unwrap();
    assert_eq!(current.id, other.id);
    assert!(current.messages.is_empty());
}

#[tokio::test]
async fn append_to_deleted_session_is_none() {
    let (_, store) = open_memory().await;
    let gone = store.create_session(None).await;
    store.delete_session(gone.id).await;

    let appended = store
        .append_message_to(gone.id, ChatMessage::assistant("late", None), None)
        .await;
    assert!(appended.is_none());
    assert!(store.get_session(gone.id).await.is_none());
}

#[tokio::test]
async fn attach_to_named_session() {
    let (_, store) = open_memory().await;
    let first = store.create_session(None).await;
    store
        .append_message(ChatMessage::assistant("v1", None), Some(deck(&["One"])))
        .await;
    store.create_session(None).await;

    assert!(store.attach_document_to_session(first.id, deck(&["Two"])).await);
    let session = store.get_session(first.id).await.unwrap();
    assert_eq!(session.current_document().unwrap().slides()[0].title, "Two");
    assert!(store.current_document().await.is_none());
}

#[tokio::test]
async fn failed_reads_on_open_still_bootstrap() {
    let backend = Arc::new(MemoryBackend::new());
    backend.set_fail_reads(true);
    let store = SessionStore::open(backend.clone()).await;

    assert!(store.get_current_session().await.is_some());
    assert!(store.list_sessions().await.is_empty());

    backend.set_fail_reads(false);
    assert_eq!(store.list_sessions().await.len(), 1);
}

#[tokio::test]
async fn reload_from_file_restores_sessions_and_current_document() {
    let dir = tempfile::tempdir().unwrap();

    let newest_id = {
        let store = SessionStore::open(Arc::new(FileBackend::new(dir.path()))).await;
        store.append_message(ChatMessage::user("Deck about tides"), None).await;
        store
            .append_message(ChatMessage::assistant("ok", None), Some(deck(&["Tides"])))
            .await;
        store.create_session(None).await;
        store.get_current_session().await.unwrap().id
    };

    let store = SessionStore::open(Arc::new(FileBackend::new(dir.path()))).await;
    let sessions = store.list_sessions().await;
    assert_eq!(sessions.len(), 2);

    // The most recently created session is current after reload.
    assert_eq!(store.get_current_session().await.unwrap().id, newest_id);

    store.set_current_session(sessions[1].id).await;
    let doc = store.current_document().await.unwrap();
    assert_eq!(doc.slides()[0].title, "Tides");
}

#[tokio::test]
async fn persisted_layout_is_a_json_array_of_sessions() {
    let (backend, store) = open_memory().await;
    store.append_message(ChatMessage::user("hi"), None).await;

    let raw = backend.raw(SESSIONS_KEY).unwrap();
    let sessions: Vec<ChatSession> = serde_json::from_slice(&raw).unwrap();
    assert_eq!(sessions.len(), 1);

    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert!(value[0]["created_at"].is_string());
    assert_eq!(value[0]["messages"][0]["role"], "user");
}
