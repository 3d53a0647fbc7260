//! One chat turn, and manual slide edits.
//!
//! A turn records the user's message, asks the generator for a new deck
//! based on the current one, and records the assistant's reply. The reply
//! carries the new deck on success, or a retry/setup message on failure,
//! so every attempt leaves a visible entry. The reply goes to the session
//! that received the prompt, even if another session became current while
//! the model was working.

use serde::Serialize;
use slidechat_core::models::chat_history::{ChatMessage, ChatSession};
use slidechat_core::models::slide::{Slide, SlideDocument};
use tracing::{info, warn};
use ts_rs::TS;

use crate::error::ChatError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct TurnReply {
    /// The current session after the turn.
    pub session: ChatSession,
    /// The deck now on screen (unchanged if generation failed).
    pub slides: SlideDocument,
    /// Whether this turn produced a new deck.
    pub generated: bool,
}

pub async fn send_prompt(state: &AppState, prompt: &str) -> Result<TurnReply, ChatError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ChatError::EmptyPrompt);
    }

    let _turn = state.turns.lock().await;

    let asked = state
        .sessions
        .append_message(ChatMessage::user(prompt), None)
        .await;
    let session_id = asked.id;
    let prior = asked.current_document().cloned().unwrap_or_default();

    let (reply, snapshot) = match &state.generator {
        Some(generator) => match generator.generate_slides(prompt, &prior).await {
            Ok(document) => (describe(&prior, &document), Some(document)),
            Err(e) => {
                warn!(error = %e, "chat turn produced no slides");
                (e.user_message(), None)
            }
        },
        None => (
            state
                .setup_error
                .clone()
                .unwrap_or_else(|| "Slide generation is not set up.".to_string()),
            None,
        ),
    };

    let generated = snapshot.is_some();
    let session = state
        .sessions
        .append_message_to(session_id, ChatMessage::assistant(reply, None), snapshot)
        .await
        .ok_or_else(|| {
            warn!(%session_id, "session deleted during chat turn, reply dropped");
            ChatError::SessionDeleted(session_id)
        })?;
    let slides = session.current_document().cloned().unwrap_or_default();

    info!(
        session_id = %session.id,
        generated,
        slides = slides.len(),
        "chat turn complete"
    );
    Ok(TurnReply {
        session,
        slides,
        generated,
    })
}

fn describe(prior: &SlideDocument, document: &SlideDocument) -> String {
    let count = document.len();
    let noun = if count == 1 { "slide" } else { "slides" };
    if prior.is_empty() {
        format!("Here is your presentation with {count} {noun}.")
    } else {
        format!("I've updated your presentation. It now has {count} {noun}.")
    }
}

/// Replace slide `index` (0-based) of the current deck.
///
/// The edit is recorded on the last assistant message. If the transcript
/// ends with a user message instead, the edit is recorded as a new
/// assistant message so it is not lost.
pub async fn edit_slide(
    state: &AppState,
    index: usize,
    slide: Slide,
) -> Result<SlideDocument, ChatError> {
    let _turn = state.turns.lock().await;

    let session = state
        .sessions
        .get_current_session()
        .await
        .ok_or(ChatError::NoDocument)?;
    let mut document = session
        .current_document()
        .cloned()
        .ok_or(ChatError::NoDocument)?;
    let len = document.len();
    let target = document
        .slide_mut(index)
        .ok_or(ChatError::SlideIndex { index, len })?;
    *target = slide;

    if !state
        .sessions
        .attach_document_to_session(session.id, document.clone())
        .await
    {
        state
            .sessions
            .append_message_to(
                session.id,
                ChatMessage::assistant(format!("Updated slide {}.", index + 1), None),
                Some(document.clone()),
            )
            .await
            .ok_or(ChatError::SessionDeleted(session.id))?;
    }

    info!(slide = index + 1, "slide edited");
    Ok(document)
}
