/// Title given to sessions before any user message arrives.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

const TITLE_WORDS: usize = 5;
const TITLE_MAX_CHARS: usize = 30;

/// Derive a session title from the first user message: the first five
/// words, cut to 30 characters with a trailing `...` when longer.
pub fn derive_session_title(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(TITLE_WORDS).collect();
    if words.is_empty() {
        return DEFAULT_SESSION_TITLE.to_string();
    }

    let joined = words.join(" ");
    if joined.chars().count() <= TITLE_MAX_CHARS {
        return joined;
    }

    let cut: String = joined.chars().take(TITLE_MAX_CHARS).collect();
    format!("{cut}...")
}
