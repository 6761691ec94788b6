/// ContentGen error types
#[derive(Debug, thiserror::Error)]
pub enum ContentGenError {
    /// Missing credentials or model artifacts
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or malformed required input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upstream rejected the credentials
    ///
    /// Upstream variants carry the user-facing message for their category.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Transport failure talking to an upstream service
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream overload that survived the retry policy
    #[error("Upstream temporarily unavailable: {0}")]
    UpstreamTransient(String),

    /// Upstream failure that is never retried
    #[error("Upstream error: {0}")]
    UpstreamPermanent(String),

    /// External process failed to start, exited non-zero or produced garbage
    #[error("Subprocess error: {0}")]
    Subprocess(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ContentGenError {
    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create unauthorized error
    pub fn unauthorized<S: Into<String>>(msg: S) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create transient upstream error
    pub fn upstream_transient<S: Into<String>>(msg: S) -> Self {
        Self::UpstreamTransient(msg.into())
    }

    /// Create permanent upstream error
    pub fn upstream_permanent<S: Into<String>>(msg: S) -> Self {
        Self::UpstreamPermanent(msg.into())
    }

    /// Create subprocess error
    pub fn subprocess<S: Into<String>>(msg: S) -> Self {
        Self::Subprocess(msg.into())
    }
}

// HTTP response conversion
impl ContentGenError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Json(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Network(_) => 503,
            Self::Config(_) => 500,
            Self::UpstreamTransient(_) => 500,
            Self::UpstreamPermanent(_) => 500,
            Self::Subprocess(_) => 500,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }

    /// Message that is safe to show to an end user.
    ///
    /// Variants built from fixed, user-facing text pass it through; anything
    /// that may carry internal detail collapses to a generic message.
    pub fn public_message(&self) -> String {
        match self {
            Self::Config(msg)
            | Self::InvalidInput(msg)
            | Self::Unauthorized(msg)
            | Self::Network(msg)
            | Self::UpstreamTransient(msg)
            | Self::UpstreamPermanent(msg)
            | Self::Subprocess(msg) => msg.clone(),
            Self::Json(_) => "Request body is not valid JSON".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ContentGenError::invalid_input("x").status_code(), 400);
        assert_eq!(ContentGenError::unauthorized("x").status_code(), 401);
        assert_eq!(ContentGenError::network("x").status_code(), 503);
        assert_eq!(ContentGenError::config("x").status_code(), 500);
        assert_eq!(ContentGenError::subprocess("x").status_code(), 500);
    }

    #[test]
    fn test_public_message_hides_internal_detail() {
        let err: ContentGenError = anyhow::anyhow!("db password is hunter2").into();
        assert_eq!(err.public_message(), "Internal server error");

        let err: ContentGenError = std::io::Error::other("/var/secret/path").into();
        assert!(!err.public_message().contains("/var/secret"));

        let err = ContentGenError::config("Google API key is not configured");
        assert_eq!(err.public_message(), "Google API key is not configured");
    }
}
