use thiserror::Error;

/// Shown when the model could not be reached or refused the request.
pub const GENERATION_RETRY_MESSAGE: &str =
    "Sorry, I couldn't reach the slide generator. Please try again in a moment.";

/// Shown when the model answered but the answer was not a usable deck.
pub const PARSE_RETRY_MESSAGE: &str =
    "Sorry, I couldn't turn that response into slides. Please try again or rephrase your request.";

#[derive(Debug, Error)]
pub enum GenaiError {
    /// Required credential missing. Fatal to generation only.
    #[error("{0}")]
    Config(String),

    /// The upstream call failed (network, auth, quota, model unavailable).
    #[error("{0}")]
    Generation(String),

    /// The upstream answer could not be interpreted as a slide document.
    #[error("{0}")]
    Parse(String),

    #[error("prompt rendering failed: {0}")]
    Prompt(String),
}

impl GenaiError {
    pub fn generation_failed() -> Self {
        GenaiError::Generation(GENERATION_RETRY_MESSAGE.to_string())
    }

    pub fn parse_failed() -> Self {
        GenaiError::Parse(PARSE_RETRY_MESSAGE.to_string())
    }

    /// Text suitable for an assistant chat entry.
    pub fn user_message(&self) -> String {
        match self {
            GenaiError::Config(msg) => msg.clone(),
            GenaiError::Generation(_) | GenaiError::Prompt(_) => {
                GENERATION_RETRY_MESSAGE.to_string()
            }
            GenaiError::Parse(_) => PARSE_RETRY_MESSAGE.to_string(),
        }
    }
}

impl From<tera::Error> for GenaiError {
    fn from(e: tera::Error) -> Self {
        GenaiError::Prompt(e.to_string())
    }
}
