use async_trait::async_trait;

use crate::error::UpstreamError;
use crate::types::{Content, GenerationConfig};

/// Common trait for text generation backends
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate the next model turn for a conversation.
    ///
    /// Performs exactly one call to the backend and returns its text
    /// untouched.
    async fn generate(
        &self,
        history: &[Content],
        config: &GenerationConfig,
    ) -> Result<String, UpstreamError>;

    /// Single-turn generation from a bare prompt
    async fn generate_text(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, UpstreamError> {
        if prompt.trim().is_empty() {
            return Err(UpstreamError::InvalidRequest("prompt is empty".to_string()));
        }
        let history = [Content::user(prompt)];
        self.generate(&history, config).await
    }

    /// Model identifier, for logs and health output
    fn model(&self) -> &str;
}
