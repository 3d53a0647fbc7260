use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::slide::SlideDocument;
use crate::title::{self, DEFAULT_SESSION_TITLE};

/// A persisted conversation thread pairing the transcript with the slide
/// document snapshots attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatSession {
    pub id: Uuid,
    pub title: String,
    /// Set when the title was chosen explicitly; a locked title is never
    /// replaced by one derived from the first user message.
    #[serde(default)]
    pub title_locked: bool,
    pub messages: Vec<ChatMessage>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl ChatSession {
    /// A new, empty session. Passing `None` leaves the title open for
    /// derivation from the first user message.
    pub fn new(title: Option<String>) -> Self {
        let now = jiff::Timestamp::now();
        let (title, title_locked) = match title {
            Some(t) => (t, true),
            None => (DEFAULT_SESSION_TITLE.to_string(), false),
        };
        Self {
            id: Uuid::new_v4(),
            title,
            title_locked,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message, deriving the title from it when it is the first
    /// user-authored message of an unlocked session. Bumps `updated_at`.
    pub fn push_message(&mut self, message: ChatMessage) {
        if message.is_user() && !self.title_locked && !self.has_user_message() {
            self.title = title::derive_session_title(message.text());
        }
        self.messages.push(message);
        self.touch();
    }

    pub fn has_user_message(&self) -> bool {
        self.messages.iter().any(ChatMessage::is_user)
    }

    /// The slides carried by the most recent assistant message that has any.
    pub fn current_document(&self) -> Option<&SlideDocument> {
        self.messages.iter().rev().find_map(ChatMessage::slides)
    }

    /// Replace the document on the last message if it is assistant-authored.
    /// Returns `false` (leaving the session untouched) otherwise.
    pub fn attach_to_last_assistant(&mut self, document: SlideDocument) -> bool {
        match self.messages.last_mut() {
            Some(ChatMessage::Assistant { slides, .. }) => {
                *slides = Some(document);
                self.touch();
                true
            }
            _ => false,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = jiff::Timestamp::now();
    }
}

/// A single transcript entry. Only assistant turns can carry a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "role", rename_all = "snake_case")]
#[ts(export)]
pub enum ChatMessage {
    User {
        id: Uuid,
        text: String,
        timestamp: jiff::Timestamp,
    },
    Assistant {
        id: Uuid,
        text: String,
        timestamp: jiff::Timestamp,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        #[ts(optional)]
        slides: Option<SlideDocument>,
    },
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage::User {
            id: new_message_id(),
            text: text.into(),
            timestamp: jiff::Timestamp::now(),
        }
    }

    pub fn assistant(text: impl Into<String>, slides: Option<SlideDocument>) -> Self {
        ChatMessage::Assistant {
            id: new_message_id(),
            text: text.into(),
            timestamp: jiff::Timestamp::now(),
            slides,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ChatMessage::User { id, .. } | ChatMessage::Assistant { id, .. } => *id,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ChatMessage::User { text, .. } | ChatMessage::Assistant { text, .. } => text,
        }
    }

    pub fn timestamp(&self) -> jiff::Timestamp {
        match self {
            ChatMessage::User { timestamp, .. } | ChatMessage::Assistant { timestamp, .. } => {
                *timestamp
            }
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, ChatMessage::User { .. })
    }

    pub fn slides(&self) -> Option<&SlideDocument> {
        match self {
            ChatMessage::Assistant { slides, .. } => slides.as_ref(),
            ChatMessage::User { .. } => None,
        }
    }
}

/// Message ids only need to be unique within a session.
pub fn new_message_id() -> Uuid {
    Uuid::new_v4()
}
