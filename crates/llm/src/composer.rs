use contentgen_common::{AppConfig, ContentGenError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::client::GeminiClient;
use crate::llm_trait::TextGenerator;
use crate::prompts::{audience_prompt, summary_prompt, template_prompt, SummaryLength};
use crate::retry::{generate_with_retry, RetryPolicy};
use crate::session::ChatSession;
use crate::types::GenerationConfig;
use crate::validate::{categorize, validate, CategorizedError};
use crate::variants::{generate_variants, PromptFraming, VariationSet};

/// Summaries and A/B rewrites run cooler and shorter than free-form generation
const REWRITE_TEMPERATURE: f32 = 0.7;
const REWRITE_MAX_TOKENS: u32 = 1024;

/// Content operations offered to the HTTP layer.
///
/// Every operation runs under the caller deadline and a child of the
/// composer's cancellation token, uses fresh chat sessions, and returns
/// validated text or a categorized error.
pub struct Composer {
    generator: Arc<dyn TextGenerator>,
    config: Arc<GenerationConfig>,
    rewrite_config: GenerationConfig,
    policy: RetryPolicy,
    deadline: Duration,
    root: CancellationToken,
}

impl Composer {
    /// Create new composer
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        config: Arc<GenerationConfig>,
        policy: RetryPolicy,
        deadline: Duration,
    ) -> Self {
        let rewrite_config = config.with_sampling(REWRITE_TEMPERATURE, REWRITE_MAX_TOKENS);
        Self {
            generator,
            config,
            rewrite_config,
            policy,
            deadline,
            root: CancellationToken::new(),
        }
    }

    /// Gemini-backed composer from application configuration
    pub fn from_config(app: &AppConfig) -> Result<Self> {
        let client = GeminiClient::from_config(app)?;
        let config = GenerationConfig::default();
        config
            .validate()
            .map_err(|e| ContentGenError::config(format!("Invalid generation config: {}", e)))?;

        info!(
            "Composer ready - Model: {}, Attempts: {}, Delay: {}ms, Deadline: {}s",
            app.gemini_model, app.retry_max_attempts, app.retry_delay_ms, app.request_timeout_secs
        );

        Ok(Self::new(
            Arc::new(client),
            Arc::new(config),
            RetryPolicy::from_config(app),
            Duration::from_secs(app.request_timeout_secs),
        ))
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Abort every in-flight operation
    pub fn cancel_all(&self) {
        self.root.cancel();
    }

    /// Summarize `content` at the requested length
    pub async fn summarize(
        &self,
        content: &str,
        length: SummaryLength,
    ) -> std::result::Result<String, CategorizedError> {
        info!("Starting summarization - Text length: {} chars, length: {}", content.len(), length);
        self.single_turn(summary_prompt(content, length), &self.rewrite_config)
            .await
    }

    /// Formal and conversational rewrites, in that order
    pub async fn variations(
        &self,
        content: &str,
    ) -> std::result::Result<VariationSet, CategorizedError> {
        let framings = PromptFraming::ab_pair();

        self.with_deadline(|cancel| async move {
            let set = generate_variants(
                &*self.generator,
                content,
                &framings,
                &self.rewrite_config,
                &self.policy,
                &cancel,
            )
            .await
            .map_err(|err| {
                error!("Variant generation failed: {}", err);
                categorize(&err.source)
            })?;

            if set.iter().any(|v| v.text.trim().is_empty()) {
                return Err(CategorizedError::NoContent);
            }
            Ok(set)
        })
        .await
    }

    /// Free-form generation, optionally aimed at an audience
    pub async fn generate(
        &self,
        prompt: &str,
        audience: Option<&str>,
    ) -> std::result::Result<String, CategorizedError> {
        self.single_turn(audience_prompt(prompt, audience), &self.config)
            .await
    }

    /// Template-driven generation from submitted form fields
    pub async fn compose(
        &self,
        form: &serde_json::Map<String, serde_json::Value>,
        ai_prompt: &str,
        audience: Option<&str>,
    ) -> std::result::Result<String, CategorizedError> {
        self.single_turn(template_prompt(form, ai_prompt, audience), &self.config)
            .await
    }

    async fn single_turn(
        &self,
        prompt: String,
        config: &GenerationConfig,
    ) -> std::result::Result<String, CategorizedError> {
        self.with_deadline(|cancel| async move {
            let mut session = ChatSession::new();
            let raw = generate_with_retry(
                &*self.generator,
                &mut session,
                &prompt,
                config,
                &self.policy,
                &cancel,
            )
            .await;

            validate(raw).map_err(|err| {
                error!("Generation failed: {}", err);
                err
            })
        })
        .await
    }

    /// Run `op` under the caller deadline; its token is cancelled when the
    /// deadline fires or `op` finishes.
    async fn with_deadline<T, F, Fut>(&self, op: F) -> std::result::Result<T, CategorizedError>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = std::result::Result<T, CategorizedError>>,
    {
        let token = self.root.child_token();
        let _guard = token.clone().drop_guard();

        match tokio::time::timeout(self.deadline, op(token)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Operation exceeded deadline of {:?}", self.deadline);
                Err(CategorizedError::TimedOut)
            }
        }
    }
}
