use async_trait::async_trait;

use crate::error::GenaiError;

/// A text-in, text-out model.
///
/// Implementations may put raw upstream detail in the error; callers that
/// face users replace it with a retry message.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenaiError>;
}
