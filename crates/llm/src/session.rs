use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::UpstreamError;
use crate::llm_trait::TextGenerator;
use crate::types::{Content, GenerationConfig};

/// Conversation with the generation service.
///
/// History is append-only. A session belongs to one logical conversation and
/// is passed explicitly to whoever drives it; it is `Send` but deliberately
/// not shared, so two requests can never see each other's turns.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    history: Vec<Content>,
}

impl ChatSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            history: Vec::new(),
        }
    }

    /// Resume a session from earlier turns
    pub fn with_history(history: Vec<Content>) -> Self {
        Self {
            history,
            ..Self::new()
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Send one user turn and record the exchange.
    ///
    /// History is committed only after the reply arrives, so a failed or
    /// dropped send leaves the session exactly as it was.
    pub async fn send<G>(
        &mut self,
        generator: &G,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, UpstreamError>
    where
        G: TextGenerator + ?Sized,
    {
        if prompt.trim().is_empty() {
            return Err(UpstreamError::InvalidRequest("prompt is empty".to_string()));
        }

        let mut pending = Vec::with_capacity(self.history.len() + 2);
        pending.extend_from_slice(&self.history);
        pending.push(Content::user(prompt));

        let reply = generator.generate(&pending, config).await?;

        pending.push(Content::model(reply.clone()));
        self.history = pending;
        debug!(session = %self.id, turns = self.history.len(), "Chat exchange recorded");

        Ok(reply)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
