use std::time::Duration;

/// Failure of a single call to the generation service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    /// Credentials were rejected
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// Service reported transient overload or rate limiting
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Transport failure before a response was read
    #[error("network failure: {0}")]
    Network(String),

    /// Well-formed response with no text in it
    #[error("empty response")]
    Empty,

    /// Request never left the process
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Any other non-success status
    #[error("HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Prompt or answer stopped by the safety filter
    #[error("blocked by safety filter: {0}")]
    Blocked(String),

    /// Success status with a body that does not parse
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Single attempt exceeded its time limit
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    /// Caller cancelled the operation
    #[error("cancelled")]
    Cancelled,
}

impl UpstreamError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// Terminal outcome of a retried generation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Every attempt hit a transient failure
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: UpstreamError },

    /// Non-retryable failure on the given attempt
    #[error("attempt {attempt} failed: {source}")]
    Failed {
        attempt: u32,
        #[source]
        source: UpstreamError,
    },
}

impl GenerationError {
    /// The last upstream error observed
    pub fn upstream(&self) -> &UpstreamError {
        match self {
            Self::Exhausted { last, .. } => last,
            Self::Failed { source, .. } => source,
        }
    }

    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } => *attempts,
            Self::Failed { attempt, .. } => *attempt,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_overload_and_timeouts_are_transient() {
        assert!(UpstreamError::Unavailable("overloaded".into()).is_transient());
        assert!(UpstreamError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(!UpstreamError::AuthFailure("bad key".into()).is_transient());
        assert!(!UpstreamError::Network("reset".into()).is_transient());
        assert!(!UpstreamError::Empty.is_transient());
        assert!(!UpstreamError::Cancelled.is_transient());
    }

    #[test]
    fn test_generation_error_accessors() {
        let err = GenerationError::Exhausted {
            attempts: 3,
            last: UpstreamError::Unavailable("503".into()),
        };
        assert!(err.is_exhausted());
        assert_eq!(err.attempts(), 3);
        assert_eq!(err.to_string(), "gave up after 3 attempts: service unavailable: 503");

        let err = GenerationError::Failed {
            attempt: 1,
            source: UpstreamError::Empty,
        };
        assert!(!err.is_exhausted());
        assert_eq!(err.upstream(), &UpstreamError::Empty);
    }
}
