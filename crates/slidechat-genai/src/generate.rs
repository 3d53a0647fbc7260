use std::sync::Arc;
use std::time::Duration;

use slidechat_core::models::slide::SlideDocument;
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::TextGenerator;
use crate::error::GenaiError;
use crate::extract;
use crate::prompt::PromptBuilder;

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(90);

/// Turns a prompt plus the current deck into a new deck.
///
/// A pure request/response step: it never touches session state. Callers
/// record the turn themselves.
pub struct SlideGenerator {
    generator: Arc<dyn TextGenerator>,
    prompts: PromptBuilder,
    timeout: Duration,
}

impl SlideGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Result<Self, GenaiError> {
        Ok(Self {
            generator,
            prompts: PromptBuilder::new()?,
            timeout: DEFAULT_GENERATION_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generate a replacement for `prior`.
    ///
    /// Upstream failures (including timeout) become
    /// [`GenaiError::Generation`] and unusable answers become
    /// [`GenaiError::Parse`]; both carry only a user-facing retry message.
    /// Raw upstream detail is logged, not returned.
    pub async fn generate_slides(
        &self,
        prompt: &str,
        prior: &SlideDocument,
    ) -> Result<SlideDocument, GenaiError> {
        let request_id = Uuid::new_v4();
        info!(
            request_id = %request_id,
            prior_slides = prior.len(),
            "starting slide generation"
        );

        let instructions = self.prompts.build(prompt, prior).map_err(|e| {
            warn!(request_id = %request_id, error = %e, "prompt rendering failed");
            GenaiError::generation_failed()
        })?;

        let raw = match tokio::time::timeout(self.timeout, self.generator.generate(&instructions))
            .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(GenaiError::Config(msg))) => return Err(GenaiError::Config(msg)),
            Ok(Err(e)) => {
                warn!(request_id = %request_id, error = %e, "upstream generation failed");
                return Err(GenaiError::generation_failed());
            }
            Err(_) => {
                warn!(
                    request_id = %request_id,
                    timeout_secs = self.timeout.as_secs(),
                    "upstream generation timed out"
                );
                return Err(GenaiError::generation_failed());
            }
        };

        let document = extract::slides_from_response(&raw).map_err(|e| {
            warn!(
                request_id = %request_id,
                error = %e,
                response_len = raw.len(),
                "model response rejected"
            );
            GenaiError::parse_failed()
        })?;

        info!(
            request_id = %request_id,
            slides = document.len(),
            "slide generation complete"
        );
        Ok(document)
    }
}
