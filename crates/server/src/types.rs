use contentgen_llm::SummaryLength;
use serde::{Deserialize, Serialize};

/// Summarize request
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// Text to summarize
    #[serde(default)]
    pub content: Option<String>,

    /// Summary length (defaults to medium)
    #[serde(default)]
    pub length: Option<SummaryLength>,
}

/// Summarize response
#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// A/B variation request
#[derive(Debug, Deserialize)]
pub struct VariationsRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// A/B variation response, formal first
#[derive(Debug, Serialize, Deserialize)]
pub struct VariationsResponse {
    pub variations: Vec<String>,
}

/// Keyword extraction request
#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// Keyword extraction response
#[derive(Debug, Serialize, Deserialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
}

/// Free-form generation request
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,

    /// Audience preset key or free text
    #[serde(default)]
    pub audience: Option<String>,
}

/// Free-form generation response
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub content: String,
}

/// Template generation request
#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    /// Form fields as submitted
    #[serde(default)]
    pub form: serde_json::Map<String, serde_json::Value>,

    /// The template's own instruction
    #[serde(default)]
    pub ai_prompt: Option<String>,

    #[serde(default)]
    pub audience: Option<String>,
}

/// Template generation response
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateResponse {
    pub output: String,
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: Option<String>,
    pub generation_configured: bool,
    pub keywords_ready: bool,
}

/// Error body returned by every route
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Non-blank trimmed text, or None
pub fn required_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
