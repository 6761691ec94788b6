use async_trait::async_trait;
use contentgen_common::{AppConfig, ContentGenError, Result};
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::error::UpstreamError;
use crate::llm_trait::TextGenerator;
use crate::types::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};

/// Longest slice of an unparsable error body kept in the error message
const MAX_ERROR_BODY: usize = 200;

/// Gemini REST client
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    /// Create new Gemini client
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = model.into();
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| ContentGenError::config(format!("Failed to create HTTP client: {}", e)))?;

        info!("Gemini client initialized: {} ({})", base_url, model);
        Ok(Self {
            base_url,
            model,
            api_key: api_key.into(),
            client,
        })
    }

    /// Create client from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config
            .gemini_api_key
            .as_deref()
            .ok_or_else(|| ContentGenError::config("Google API key is not configured"))?;

        Self::new(&config.gemini_base_url, &config.gemini_model, api_key)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        history: &[Content],
        config: &GenerationConfig,
    ) -> std::result::Result<String, UpstreamError> {
        match history.last() {
            Some(turn) if !turn.text().trim().is_empty() => {}
            _ => return Err(UpstreamError::InvalidRequest("prompt is empty".to_string())),
        }

        debug!(
            "Sending generateContent request - Model: {}, Turns: {}, Prompt length: {}",
            self.model,
            history.len(),
            history.last().map(|t| t.text().len()).unwrap_or(0)
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::new(history, config))
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Network(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| UpstreamError::Malformed(e.to_string()))?;

        let text = extract_text(parsed)?;
        debug!("Received response from Gemini - Length: {}", text.len());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Map a non-success response onto the upstream error taxonomy.
///
/// Structured fields (HTTP status, RPC status, error reasons) decide first;
/// the message text is only consulted for the overload marker.
fn classify_failure(status: StatusCode, body: &str) -> UpstreamError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = match &envelope {
        Some(env) if !env.error.message.is_empty() => env.error.message.clone(),
        _ if body.trim().is_empty() => status.to_string(),
        _ => body.chars().take(MAX_ERROR_BODY).collect(),
    };
    let rpc_status = envelope.as_ref().and_then(|e| e.error.status.as_deref());
    let key_invalid = envelope
        .as_ref()
        .map(|e| e.error.reasons().any(|r| r == "API_KEY_INVALID"))
        .unwrap_or(false);

    if key_invalid
        || matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || matches!(rpc_status, Some("UNAUTHENTICATED" | "PERMISSION_DENIED"))
    {
        return UpstreamError::AuthFailure(message);
    }

    if matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    ) || matches!(
        rpc_status,
        Some("RESOURCE_EXHAUSTED" | "INTERNAL" | "UNAVAILABLE" | "DEADLINE_EXCEEDED")
    ) || message.contains("overloaded")
    {
        return UpstreamError::Unavailable(message);
    }

    UpstreamError::Rejected {
        status: status.as_u16(),
        message,
    }
}

/// Pull the text out of the first candidate
fn extract_text(response: GenerateContentResponse) -> std::result::Result<String, UpstreamError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|f| f.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(match block_reason {
            Some(reason) => UpstreamError::Blocked(reason),
            None => UpstreamError::Empty,
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(match candidate.finish_reason.as_deref() {
            Some("SAFETY") => UpstreamError::Blocked("SAFETY".to_string()),
            _ => UpstreamError::Empty,
        });
    }

    Ok(text)
}
