use contentgen_common::{AppConfig, ContentGenError, Result};
use contentgen_keywords::KeywordExtractor;
use contentgen_llm::Composer;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Generation service; absent when no API key is configured
    pub composer: Option<Arc<Composer>>,

    /// Keyword extraction process runner
    pub keywords: KeywordExtractor,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig) -> Result<Self> {
        let composer = if config.has_api_key() {
            Some(Arc::new(Composer::from_config(&config)?))
        } else {
            warn!("No Gemini API key configured; generation routes will answer 500");
            None
        };

        let keywords = KeywordExtractor::from_config(&config);
        if let Err(e) = keywords.check_ready() {
            warn!("Keyword extraction unavailable: {}", e);
        }

        info!("Application state initialized");
        Ok(Self::with_parts(config, composer, keywords))
    }

    /// Assemble state from prebuilt services
    pub fn with_parts(
        config: AppConfig,
        composer: Option<Arc<Composer>>,
        keywords: KeywordExtractor,
    ) -> Self {
        Self {
            config,
            composer,
            keywords,
        }
    }

    /// The composer, or the configuration error every generation route reports
    pub fn composer(&self) -> Result<&Composer> {
        self.composer
            .as_deref()
            .ok_or_else(|| ContentGenError::config("Google API key is not configured"))
    }
}
