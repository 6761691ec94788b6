use contentgen_common::ContentGenError;
use std::path::PathBuf;
use std::time::Duration;

/// Keyword extraction failures
#[derive(Debug, thiserror::Error)]
pub enum KeywordError {
    /// Script not present at the configured path
    #[error("keyword script not found at {0}")]
    ScriptMissing(PathBuf),

    /// A model artifact is missing
    #[error("keyword model artifact not found at {0}")]
    ModelMissing(PathBuf),

    /// Process could not be started
    #[error("failed to start keyword process: {0}")]
    Spawn(#[source] std::io::Error),

    /// Process exited non-zero
    #[error("keyword process exited with {code:?}: {stderr}")]
    ExitStatus { code: Option<i32>, stderr: String },

    /// Stdout was not a JSON array of strings
    #[error("unparsable keyword output {raw:?}: {source}")]
    Parse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Process did not finish in time
    #[error("keyword process timed out after {0:?}")]
    TimedOut(Duration),
}

impl KeywordError {
    /// Missing script or model: an installation problem, not a runtime one
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ScriptMissing(_) | Self::ModelMissing(_))
    }

    /// Fixed message shown to users
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ScriptMissing(_) => "Keyword extraction service is not properly configured",
            Self::ModelMissing(_) => "Keyword extraction model files are missing",
            Self::Spawn(_) => "Failed to start keyword extraction process",
            Self::ExitStatus { .. } => "Keyword extraction failed. Please try again.",
            Self::Parse { .. } => "Failed to process keyword extraction results",
            Self::TimedOut(_) => "Keyword extraction timed out. Please try again.",
        }
    }
}

impl From<KeywordError> for ContentGenError {
    fn from(err: KeywordError) -> Self {
        if err.is_configuration() {
            ContentGenError::config(err.user_message())
        } else {
            ContentGenError::subprocess(err.user_message())
        }
    }
}
