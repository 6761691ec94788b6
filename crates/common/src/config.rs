use crate::error::ContentGenError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the trained keyword classifier inside `keyword_model_dir`
pub const KEYWORD_MODEL_FILE: &str = "keyword_extractor_model.pkl";

/// File name of the keyword label binarizer inside `keyword_model_dir`
pub const KEYWORD_LABELS_FILE: &str = "keyword_mlb.pkl";

/// ContentGen application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini API key (absent means generation routes answer 500)
    #[serde(skip_serializing)]
    pub gemini_api_key: Option<String>,

    /// Gemini REST base URL
    pub gemini_base_url: String,

    /// Gemini model name
    pub gemini_model: String,

    /// Attempts per generation before giving up on transient overload
    pub retry_max_attempts: u32,

    /// Fixed delay between attempts in milliseconds
    pub retry_delay_ms: u64,

    /// Deadline for one orchestrated request in seconds
    pub request_timeout_secs: u64,

    /// Python interpreter used for keyword extraction
    pub python_executable: PathBuf,

    /// Keyword extraction script
    pub keyword_script: PathBuf,

    /// Directory holding the keyword model artifacts
    pub keyword_model_dir: PathBuf,

    /// Deadline for the keyword extraction process in seconds
    pub keyword_timeout_secs: u64,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
            retry_max_attempts: 3,
            retry_delay_ms: 2000,
            request_timeout_secs: 60,
            python_executable: PathBuf::from("venv/bin/python"),
            keyword_script: PathBuf::from("scripts/extract_keywords.py"),
            keyword_model_dir: PathBuf::from("ml_models"),
            keyword_timeout_secs: 30,
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, ContentGenError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let config = Self::from_lookup(|key| std::env::var(key).ok());

        config.ensure_directories()?;

        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            gemini_api_key: non_empty("GOOGLE_GEMINI_API_KEY")
                .or_else(|| non_empty("NEXT_PUBLIC_GOOGLE_GEMINI_API_KEY")),
            gemini_base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            retry_max_attempts: non_empty("RETRY_MAX_ATTEMPTS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.retry_max_attempts),
            retry_delay_ms: non_empty("RETRY_DELAY_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.retry_delay_ms),
            request_timeout_secs: non_empty("REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            python_executable: non_empty("KEYWORD_PYTHON")
                .map(PathBuf::from)
                .unwrap_or(defaults.python_executable),
            keyword_script: non_empty("KEYWORD_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.keyword_script),
            keyword_model_dir: non_empty("KEYWORD_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.keyword_model_dir),
            keyword_timeout_secs: non_empty("KEYWORD_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.keyword_timeout_secs),
            server_host: non_empty("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: non_empty("SERVER_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            log_dir: non_empty("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
            log_level: non_empty("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), ContentGenError> {
        if !self.log_dir.exists() {
            std::fs::create_dir_all(&self.log_dir).map_err(|e| {
                ContentGenError::config(format!(
                    "Failed to create directory {}: {}",
                    self.log_dir.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Whether a Gemini API key is present
    pub fn has_api_key(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    /// Paths of the keyword model artifacts (classifier, label binarizer)
    pub fn keyword_model_paths(&self) -> (PathBuf, PathBuf) {
        (
            self.keyword_model_dir.join(KEYWORD_MODEL_FILE),
            self.keyword_model_dir.join(KEYWORD_LABELS_FILE),
        )
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ContentGenError> {
        if self.gemini_model.is_empty() {
            return Err(ContentGenError::config("Gemini model name cannot be empty"));
        }

        if !self.gemini_base_url.starts_with("http://")
            && !self.gemini_base_url.starts_with("https://")
        {
            return Err(ContentGenError::config(
                "Gemini base URL must start with http:// or https://",
            ));
        }

        if self.retry_max_attempts == 0 {
            return Err(ContentGenError::config("Retry attempts must be at least 1"));
        }

        if self.server_port == 0 {
            return Err(ContentGenError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}
