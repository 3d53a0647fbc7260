use slidechat_core::models::chat_history::{ChatMessage, ChatSession};
use slidechat_core::models::slide::{Layout, Slide, SlideDocument};
use slidechat_core::title::{DEFAULT_SESSION_TITLE, derive_session_title};

fn one_slide(title: &str) -> SlideDocument {
    SlideDocument::new(vec![Slide::new(title, vec!["x".to_string()], Layout::Title)])
}

#[test]
fn title_keeps_short_prompts_whole() {
    assert_eq!(derive_session_title("Rust ownership basics"), "Rust ownership basics");
}

#[test]
fn title_takes_first_five_words_and_truncates() {
    let text = "Photosynthesis explained to kids a b c d";
    assert_eq!(text.chars().count(), 40);
    assert_eq!(text.split_whitespace().count(), 8);

    // "Photosynthesis explained to kids a" is 34 chars, cut to 30.
    let title = derive_session_title(text);
    assert_eq!(title, "Photosynthesis explained to ki...");
}

#[test]
fn title_truncation_respects_char_boundaries() {
    let title = derive_session_title("ééééééééééééééééééééééééééééééééééé");
    assert_eq!(title.chars().count(), 33);
    assert!(title.ends_with("..."));
}

#[test]
fn blank_text_gets_default_title() {
    assert_eq!(derive_session_title("   "), DEFAULT_SESSION_TITLE);
}

#[test]
fn first_user_message_names_unlocked_session() {
    let mut session = ChatSession::new(None);
    assert_eq!(session.title, DEFAULT_SESSION_TITLE);

    session.push_message(ChatMessage::user("Deck on coral reefs"));
    session.push_message(ChatMessage::user("Make it shorter please"));
    assert_eq!(session.title, "Deck on coral reefs");
}

#[test]
fn explicit_title_is_never_replaced() {
    let mut session = ChatSession::new(Some("Quarterly review".to_string()));
    session.push_message(ChatMessage::user("Deck on coral reefs"));
    assert_eq!(session.title, "Quarterly review");
}

#[test]
fn current_document_is_last_assistant_document() {
    let mut session = ChatSession::new(None);
    session.push_message(ChatMessage::user("first"));
    session.push_message(ChatMessage::assistant("done", Some(one_slide("A"))));
    session.push_message(ChatMessage::user("again"));
    session.push_message(ChatMessage::assistant("failed, retry", None));

    let doc = session.current_document().expect("a document was generated");
    assert_eq!(doc.slides()[0].title, "A");
}

#[test]
fn attach_is_noop_after_user_message() {
    let mut session = ChatSession::new(None);
    session.push_message(ChatMessage::assistant("hello", None));
    session.push_message(ChatMessage::user("hi"));
    let before = session.clone();

    assert!(!session.attach_to_last_assistant(one_slide("B")));
    assert_eq!(session, before);
}

#[test]
fn message_serializes_with_role_tag_and_iso_timestamp() {
    let msg = ChatMessage::assistant("ok", Some(one_slide("A")));
    let value = serde_json::to_value(&msg).unwrap();

    assert_eq!(value["role"], "assistant");
    assert_eq!(value["slides"][0]["layout"], "TITLE");
    let ts = value["timestamp"].as_str().unwrap();
    assert!(ts.contains('T') && ts.ends_with('Z'));

    let back: ChatMessage = serde_json::from_value(value).unwrap();
    assert_eq!(back, msg);
}

#[test]
fn user_message_has_no_slides_field() {
    let value = serde_json::to_value(ChatMessage::user("hi")).unwrap();
    assert_eq!(value["role"], "user");
    assert!(value.get("slides").is_none());
}
