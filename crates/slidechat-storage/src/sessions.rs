//! The session store: single writer of the persisted session collection.
//!
//! The whole collection lives under one key and is read-modify-written on
//! every mutation. The mutex makes each operation atomic from the caller's
//! point of view; concurrent processes sharing a backend get
//! last-write-wins.
//!
//! Storage failures never reach callers. A failed read falls back to the
//! last collection this process saw, and a failed write leaves the
//! in-memory collection ahead of the persisted one. Both are logged. While
//! the in-memory collection is ahead, it is not re-read from the backend,
//! and the next mutation retries the save.

use std::sync::Arc;

use slidechat_core::models::chat_history::{ChatMessage, ChatSession};
use slidechat_core::models::slide::SlideDocument;
use slidechat_core::title::derive_session_title;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::StateBackend;
use crate::error::StorageError;
use crate::state;

/// Backend key holding the serialized session collection.
pub const SESSIONS_KEY: &str = "slidechat.sessions";

pub struct SessionStore {
    backend: Arc<dyn StateBackend>,
    inner: Mutex<Inner>,
}

struct Inner {
    /// Most recently created first.
    sessions: Vec<ChatSession>,
    /// Process-local; never persisted.
    current: Option<Uuid>,
    /// The last save failed, so `sessions` holds unpersisted changes.
    dirty: bool,
}

impl SessionStore {
    /// Load the persisted collection, creating the default session if there
    /// is none. The current session becomes the front of the collection.
    pub async fn open(backend: Arc<dyn StateBackend>) -> Self {
        let store = Self {
            backend,
            inner: Mutex::new(Inner {
                sessions: Vec::new(),
                current: None,
                dirty: false,
            }),
        };

        {
            let mut inner = store.inner.lock().await;
            let _ = store.refresh(&mut inner).await;
            if inner.sessions.is_empty() {
                store.bootstrap(&mut inner).await;
            } else {
                inner.current = inner.sessions.first().map(|s| s.id);
            }
            info!(sessions = inner.sessions.len(), "session store opened");
        }

        store
    }

    /// All sessions, most recently created first. Returns an empty list if
    /// the persisted collection cannot be read.
    pub async fn list_sessions(&self) -> Vec<ChatSession> {
        let mut inner = self.inner.lock().await;
        match self.refresh(&mut inner).await {
            Ok(()) => inner.sessions.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Create a session at the front of the collection and make it current.
    pub async fn create_session(&self, title: Option<String>) -> ChatSession {
        let mut inner = self.inner.lock().await;
        let _ = self.refresh(&mut inner).await;

        let session = ChatSession::new(title);
        inner.sessions.insert(0, session.clone());
        inner.current = Some(session.id);
        self.persist(&mut inner).await;

        info!(session_id = %session.id, title = %session.title, "session created");
        session
    }

    pub async fn get_session(&self, id: Uuid) -> Option<ChatSession> {
        let mut inner = self.inner.lock().await;
        let _ = self.refresh(&mut inner).await;
        inner.sessions.iter().find(|s| s.id == id).cloned()
    }

    /// The current session, or `None` if the pointer is unset or names a
    /// session that no longer exists.
    pub async fn get_current_session(&self) -> Option<ChatSession> {
        let mut inner = self.inner.lock().await;
        let _ = self.refresh(&mut inner).await;
        current_index(&inner).map(|i| inner.sessions[i].clone())
    }

    /// Point the current session at `id`. Existence is checked lazily by
    /// [`SessionStore::get_current_session`].
    pub async fn set_current_session(&self, id: Uuid) {
        self.inner.lock().await.current = Some(id);
    }

    /// Append a message to the current session, creating one (titled from
    /// the message) if there is none. A document snapshot is attached only
    /// to assistant messages. Returns the updated session.
    pub async fn append_message(
        &self,
        message: ChatMessage,
        snapshot: Option<SlideDocument>,
    ) -> ChatSession {
        let mut inner = self.inner.lock().await;
        let _ = self.refresh(&mut inner).await;

        let index = match current_index(&inner) {
            Some(i) => i,
            None => {
                let mut session = ChatSession::new(None);
                session.title = derive_session_title(message.text());
                info!(session_id = %session.id, "session created implicitly");
                inner.current = Some(session.id);
                inner.sessions.insert(0, session);
                0
            }
        };

        self.push(&mut inner, index, message, snapshot).await
    }

    /// Append a message to the session `id`, whether or not it is current.
    /// Returns `None` if the session no longer exists.
    pub async fn append_message_to(
        &self,
        id: Uuid,
        message: ChatMessage,
        snapshot: Option<SlideDocument>,
    ) -> Option<ChatSession> {
        let mut inner = self.inner.lock().await;
        let _ = self.refresh(&mut inner).await;

        let Some(index) = inner.sessions.iter().position(|s| s.id == id) else {
            debug!(session_id = %id, "append to unknown session ignored");
            return None;
        };
        Some(self.push(&mut inner, index, message, snapshot).await)
    }

    async fn push(
        &self,
        inner: &mut Inner,
        index: usize,
        mut message: ChatMessage,
        snapshot: Option<SlideDocument>,
    ) -> ChatSession {
        if let Some(document) = snapshot {
            match &mut message {
                ChatMessage::Assistant { slides, .. } => *slides = Some(document),
                ChatMessage::User { .. } => {
                    debug!("ignoring document snapshot on user message");
                }
            }
        }

        let session = &mut inner.sessions[index];
        session.push_message(message);
        let updated = session.clone();
        self.persist(inner).await;

        debug!(
            session_id = %updated.id,
            messages = updated.messages.len(),
            "message appended"
        );
        updated
    }

    /// Replace the document on the current session's last message if that
    /// message is assistant-authored. Returns whether anything changed.
    pub async fn attach_document_to_last_assistant_message(&self, document: SlideDocument) -> bool {
        let mut inner = self.inner.lock().await;
        let _ = self.refresh(&mut inner).await;

        let Some(index) = current_index(&inner) else {
            return false;
        };
        self.attach_at(&mut inner, index, document).await
    }

    /// Like [`SessionStore::attach_document_to_last_assistant_message`], for
    /// the session `id` rather than the current one.
    pub async fn attach_document_to_session(&self, id: Uuid, document: SlideDocument) -> bool {
        let mut inner = self.inner.lock().await;
        let _ = self.refresh(&mut inner).await;

        let Some(index) = inner.sessions.iter().position(|s| s.id == id) else {
            return false;
        };
        self.attach_at(&mut inner, index, document).await
    }

    async fn attach_at(&self, inner: &mut Inner, index: usize, document: SlideDocument) -> bool {
        if !inner.sessions[index].attach_to_last_assistant(document) {
            return false;
        }
        self.persist(inner).await;
        true
    }

    /// The current session's latest document, if any turn produced one.
    pub async fn current_document(&self) -> Option<SlideDocument> {
        self.get_current_session()
            .await
            .and_then(|s| s.current_document().cloned())
    }

    /// Set an explicit title. Returns `false` if the session does not exist.
    pub async fn rename_session(&self, id: Uuid, title: String) -> bool {
        let mut inner = self.inner.lock().await;
        let _ = self.refresh(&mut inner).await;

        let Some(session) = inner.sessions.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        session.title = title;
        session.title_locked = true;
        session.touch();
        self.persist(&mut inner).await;
        true
    }

    /// Remove a session. If it was current, the front session becomes
    /// current (or none, if the collection is now empty).
    pub async fn delete_session(&self, id: Uuid) {
        let mut inner = self.inner.lock().await;
        let _ = self.refresh(&mut inner).await;

        let before = inner.sessions.len();
        inner.sessions.retain(|s| s.id != id);
        if inner.sessions.len() == before {
            debug!(session_id = %id, "delete of unknown session ignored");
            return;
        }

        if inner.current == Some(id) {
            inner.current = inner.sessions.first().map(|s| s.id);
        }
        self.persist(&mut inner).await;
        info!(session_id = %id, "session deleted");
    }

    /// Drop every session and re-create the default one.
    pub async fn clear_all(&self) {
        let mut inner = self.inner.lock().await;
        inner.sessions.clear();
        inner.current = None;
        self.bootstrap(&mut inner).await;
        info!("all sessions cleared");
    }

    async fn bootstrap(&self, inner: &mut Inner) {
        let session = ChatSession::new(None);
        inner.current = Some(session.id);
        inner.sessions.insert(0, session);
        self.persist(inner).await;
    }

    /// Re-read the persisted collection into `inner`. On failure the
    /// previous in-memory collection is kept and the error returned. Skipped
    /// while `inner` holds unsaved changes.
    async fn refresh(&self, inner: &mut Inner) -> Result<(), StorageError> {
        if inner.dirty {
            debug!("unsaved sessions in memory, skipping reload");
            return Ok(());
        }
        match state::load_state::<Vec<ChatSession>>(self.backend.as_ref(), SESSIONS_KEY).await {
            Ok(sessions) => {
                inner.sessions = sessions;
                Ok(())
            }
            Err(StorageError::NotFound { .. }) => Ok(()),
            Err(e) => {
                warn!(error = %e, "failed to load sessions, using in-memory state");
                Err(e)
            }
        }
    }

    async fn persist(&self, inner: &mut Inner) {
        match state::save_state(self.backend.as_ref(), SESSIONS_KEY, &inner.sessions).await {
            Ok(()) => {
                if inner.dirty {
                    info!("unsaved sessions written");
                }
                inner.dirty = false;
            }
            Err(e) => {
                warn!(error = %e, "failed to save sessions, keeping in-memory state");
                inner.dirty = true;
            }
        }
    }
}

fn current_index(inner: &Inner) -> Option<usize> {
    let id = inner.current?;
    inner.sessions.iter().position(|s| s.id == id)
}
