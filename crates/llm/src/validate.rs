//! Response validation and mapping of upstream failures to the small set of
//! categories callers show to users.

use contentgen_common::ContentGenError;

use crate::error::{GenerationError, UpstreamError};

/// User-facing failure category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategorizedError {
    #[error("no content generated")]
    NoContent,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("network failure")]
    NetworkFailure,

    #[error("service overloaded after {attempts} attempts")]
    Overloaded { attempts: u32 },

    #[error("blocked by content filter")]
    Blocked,

    #[error("timed out")]
    TimedOut,

    /// Anything unclassified; keeps the original message for diagnostics
    #[error("unknown failure: {0}")]
    Unknown(String),
}

impl CategorizedError {
    /// Short actionable message; `fallback` covers `Unknown`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::NoContent => "No content was generated. Please try again.".to_string(),
            Self::InvalidCredentials => {
                "Invalid API key. Please check your configuration.".to_string()
            }
            Self::NetworkFailure => "Network error. Please check your connection.".to_string(),
            Self::Overloaded { .. } => {
                "The AI service is busy. Please try again in a few moments.".to_string()
            }
            Self::Blocked => {
                "The request was blocked by the content safety filter.".to_string()
            }
            Self::TimedOut => "The request took too long. Please try again.".to_string(),
            Self::Unknown(_) => fallback.to_string(),
        }
    }

    /// Application error carrying this category's user message
    pub fn into_app_error(self, fallback: &str) -> ContentGenError {
        let message = self.user_message(fallback);
        match self {
            Self::InvalidCredentials => ContentGenError::unauthorized(message),
            Self::NetworkFailure => ContentGenError::network(message),
            Self::Overloaded { .. } | Self::TimedOut => ContentGenError::upstream_transient(message),
            Self::NoContent | Self::Blocked | Self::Unknown(_) => {
                ContentGenError::upstream_permanent(message)
            }
        }
    }
}

/// Accept non-blank text, categorize everything else.
///
/// Successful text is passed through unchanged.
pub fn validate(raw: Result<String, GenerationError>) -> Result<String, CategorizedError> {
    match raw {
        Ok(text) if text.trim().is_empty() => Err(CategorizedError::NoContent),
        Ok(text) => Ok(text),
        Err(err) => Err(categorize(&err)),
    }
}

/// Categorize the outcome of a retried generation
pub fn categorize(err: &GenerationError) -> CategorizedError {
    match err {
        GenerationError::Exhausted {
            last: UpstreamError::Timeout(_),
            ..
        } => CategorizedError::TimedOut,
        GenerationError::Exhausted { attempts, .. } => CategorizedError::Overloaded {
            attempts: *attempts,
        },
        GenerationError::Failed { attempt, source } => match source {
            UpstreamError::Unavailable(_) => CategorizedError::Overloaded { attempts: *attempt },
            other => categorize_upstream(other),
        },
    }
}

/// Categorize a single-call failure.
///
/// Typed kinds map directly. Only kinds that carry nothing but upstream text
/// fall through to [`categorize_message`].
pub fn categorize_upstream(err: &UpstreamError) -> CategorizedError {
    match err {
        UpstreamError::AuthFailure(_) => CategorizedError::InvalidCredentials,
        UpstreamError::Network(_) => CategorizedError::NetworkFailure,
        UpstreamError::Empty => CategorizedError::NoContent,
        UpstreamError::Unavailable(_) => CategorizedError::Overloaded { attempts: 1 },
        UpstreamError::Blocked(_) => CategorizedError::Blocked,
        UpstreamError::Timeout(_) | UpstreamError::Cancelled => CategorizedError::TimedOut,
        UpstreamError::InvalidRequest(message)
        | UpstreamError::Malformed(message)
        | UpstreamError::Rejected { message, .. } => categorize_message(message),
    }
}

/// Substring heuristic for unstructured upstream messages.
///
/// Fragile by nature: it keys on "API key" and "network" appearing verbatim
/// (case-sensitive) in text the upstream service controls. Used only when no
/// structured signal exists.
pub fn categorize_message(message: &str) -> CategorizedError {
    if message.contains("API key") {
        CategorizedError::InvalidCredentials
    } else if message.contains("network") {
        CategorizedError::NetworkFailure
    } else {
        CategorizedError::Unknown(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn failed(source: UpstreamError) -> Result<String, GenerationError> {
        Err(GenerationError::Failed { attempt: 1, source })
    }

    #[test]
    fn test_blank_text_is_no_content() {
        assert_eq!(validate(Ok(String::new())), Err(CategorizedError::NoContent));
        assert_eq!(validate(Ok(" \n\t".to_string())), Err(CategorizedError::NoContent));
        assert_eq!(validate(Ok(" keep  spacing ".to_string())), Ok(" keep  spacing ".to_string()));
    }

    #[test]
    fn test_message_signatures() {
        assert_eq!(
            validate(failed(UpstreamError::InvalidRequest(
                "API key not valid. Please pass a valid API key.".to_string()
            ))),
            Err(CategorizedError::InvalidCredentials)
        );
        assert_eq!(
            validate(failed(UpstreamError::Rejected {
                status: 400,
                message: "a network error occurred".to_string()
            })),
            Err(CategorizedError::NetworkFailure)
        );
        assert_eq!(
            validate(failed(UpstreamError::Malformed("unexpected token <".to_string()))),
            Err(CategorizedError::Unknown("unexpected token <".to_string()))
        );
    }

    #[test]
    fn test_heuristic_is_case_sensitive() {
        assert_eq!(
            categorize_message("api key missing"),
            CategorizedError::Unknown("api key missing".to_string())
        );
        assert_eq!(categorize_message("Network down"), CategorizedError::Unknown("Network down".to_string()));
    }

    #[test]
    fn test_structured_kinds_win_over_text() {
        // message mentions "network" but the kind says credentials
        let err = UpstreamError::AuthFailure("key revoked by network admin".to_string());
        assert_eq!(categorize_upstream(&err), CategorizedError::InvalidCredentials);

        assert_eq!(
            categorize_upstream(&UpstreamError::Network("reset".to_string())),
            CategorizedError::NetworkFailure
        );
        assert_eq!(categorize_upstream(&UpstreamError::Empty), CategorizedError::NoContent);
        assert_eq!(
            categorize_upstream(&UpstreamError::Blocked("SAFETY".to_string())),
            CategorizedError::Blocked
        );
    }

    #[test]
    fn test_exhausted_retries() {
        let err = GenerationError::Exhausted {
            attempts: 3,
            last: UpstreamError::Unavailable("overloaded".to_string()),
        };
        assert_eq!(categorize(&err), CategorizedError::Overloaded { attempts: 3 });

        let err = GenerationError::Exhausted {
            attempts: 2,
            last: UpstreamError::Timeout(Duration::from_secs(5)),
        };
        assert_eq!(categorize(&err), CategorizedError::TimedOut);
    }

    #[test]
    fn test_status_codes_and_messages() {
        let status = |err: CategorizedError| err.into_app_error("fallback").status_code();
        assert_eq!(status(CategorizedError::InvalidCredentials), 401);
        assert_eq!(status(CategorizedError::NetworkFailure), 503);
        assert_eq!(status(CategorizedError::Overloaded { attempts: 3 }), 500);
        assert_eq!(status(CategorizedError::NoContent), 500);
        assert_eq!(status(CategorizedError::Unknown("x".to_string())), 500);

        assert_eq!(
            CategorizedError::NetworkFailure.user_message("fallback"),
            "Network error. Please check your connection."
        );
        assert_eq!(
            CategorizedError::Unknown("raw upstream text".to_string()).user_message("Failed to generate summary. Please try again."),
            "Failed to generate summary. Please try again."
        );
    }

    #[test]
    fn test_app_error_keeps_user_message() {
        let err = CategorizedError::Overloaded { attempts: 3 }.into_app_error("fallback");
        assert!(matches!(err, ContentGenError::UpstreamTransient(_)));
        assert!(err.public_message().contains("busy"));

        let err = CategorizedError::Unknown("HTTP 418: raw body".to_string())
            .into_app_error("Failed to generate summary. Please try again.");
        assert!(matches!(err, ContentGenError::UpstreamPermanent(_)));
        assert_eq!(err.public_message(), "Failed to generate summary. Please try again.");
    }
}
