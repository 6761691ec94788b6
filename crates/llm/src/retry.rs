use contentgen_common::AppConfig;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::error::{GenerationError, UpstreamError};
use crate::llm_trait::TextGenerator;
use crate::session::ChatSession;
use crate::types::GenerationConfig;

/// Bounded retry for transient upstream overload.
///
/// Fixed attempt count and fixed delay; no exponential growth, no jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,

    /// Pause between attempts
    pub delay: Duration,

    /// Time limit for a single attempt
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
            attempt_timeout: None,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            attempt_timeout: None,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Policy from `RETRY_MAX_ATTEMPTS` / `RETRY_DELAY_MS`
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.retry_max_attempts,
            Duration::from_millis(config.retry_delay_ms),
        )
    }
}

/// Run one chat exchange, retrying only transient failures.
///
/// Any other error ends the loop on the attempt that produced it. Cancelling
/// `cancel` aborts an in-flight attempt or a pending delay with
/// [`UpstreamError::Cancelled`].
pub async fn generate_with_retry<G>(
    generator: &G,
    session: &mut ChatSession,
    prompt: &str,
    config: &GenerationConfig,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<String, GenerationError>
where
    G: TextGenerator + ?Sized,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(UpstreamError::Cancelled),
            result = attempt_once(generator, session, prompt, config, policy.attempt_timeout) => result,
        };

        match outcome {
            Ok(text) => {
                debug!(attempt, model = generator.model(), len = text.len(), "Generation succeeded");
                return Ok(text);
            }
            Err(err) if err.is_transient() && attempt < max_attempts => {
                warn!(
                    "Generation failed (attempt {}/{}): {}. Retrying in {:?}...",
                    attempt, max_attempts, err, policy.delay
                );

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        return Err(GenerationError::Failed {
                            attempt,
                            source: UpstreamError::Cancelled,
                        });
                    }
                    _ = tokio::time::sleep(policy.delay) => {}
                }
            }
            Err(err) if err.is_transient() => {
                error!("Generation gave up after {} attempts: {}", attempt, err);
                return Err(GenerationError::Exhausted {
                    attempts: attempt,
                    last: err,
                });
            }
            Err(err) => {
                warn!(attempt, "Generation failed without retry: {}", err);
                return Err(GenerationError::Failed {
                    attempt,
                    source: err,
                });
            }
        }
    }
}

async fn attempt_once<G>(
    generator: &G,
    session: &mut ChatSession,
    prompt: &str,
    config: &GenerationConfig,
    timeout: Option<Duration>,
) -> Result<String, UpstreamError>
where
    G: TextGenerator + ?Sized,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, session.send(generator, prompt, config))
            .await
            .unwrap_or_else(|_| Err(UpstreamError::Timeout(limit))),
        None => session.send(generator, prompt, config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Content;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Replays scripted outcomes, then keeps repeating the last one
    struct Scripted {
        outcomes: Mutex<VecDeque<Result<String, UpstreamError>>>,
        calls: AtomicU32,
        latency: Duration,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<String, UpstreamError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicU32::new(0),
                latency: Duration::ZERO,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(
            &self,
            _history: &[Content],
            _config: &GenerationConfig,
        ) -> Result<String, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.len() > 1 {
                outcomes.pop_front().unwrap()
            } else {
                outcomes.front().cloned().unwrap()
            }
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn overloaded() -> Result<String, UpstreamError> {
        Err(UpstreamError::Unavailable("503 overloaded".to_string()))
    }

    async fn run(generator: &Scripted, policy: &RetryPolicy) -> Result<String, GenerationError> {
        let mut session = ChatSession::new();
        generate_with_retry(
            generator,
            &mut session,
            "write something",
            &GenerationConfig::default(),
            policy,
            &CancellationToken::new(),
        )
        .await
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_overloaded_uses_every_attempt() {
        let generator = Scripted::new(vec![overloaded()]);
        let started = tokio::time::Instant::now();

        let result = run(&generator, &RetryPolicy::default()).await;

        assert_eq!(generator.calls(), 3);
        assert_eq!(
            result,
            Err(GenerationError::Exhausted {
                attempts: 3,
                last: UpstreamError::Unavailable("503 overloaded".to_string()),
            })
        );
        // two fixed 2s pauses between three attempts
        assert!(started.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let generator = Scripted::new(vec![Err(UpstreamError::AuthFailure("bad key".to_string()))]);

        let result = run(&generator, &RetryPolicy::new(5, Duration::ZERO)).await;

        assert_eq!(generator.calls(), 1);
        let err = result.unwrap_err();
        assert!(!err.is_exhausted());
        assert_eq!(err.attempts(), 1);
        assert_eq!(err.upstream(), &UpstreamError::AuthFailure("bad key".to_string()));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let generator = Scripted::new(vec![overloaded(), Ok("done".to_string())]);

        let result = run(&generator, &RetryPolicy::new(3, Duration::ZERO)).await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_permanent_error_after_retry_reports_its_attempt() {
        let generator = Scripted::new(vec![overloaded(), Err(UpstreamError::Empty)]);

        let err = run(&generator, &RetryPolicy::new(3, Duration::ZERO))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            GenerationError::Failed {
                attempt: 2,
                source: UpstreamError::Empty
            }
        );
    }

    #[tokio::test]
    async fn test_session_only_records_successful_exchange() {
        let generator = Scripted::new(vec![overloaded(), Ok("done".to_string())]);
        let mut session = ChatSession::new();

        generate_with_retry(
            &generator,
            &mut session,
            "prompt",
            &GenerationConfig::default(),
            &RetryPolicy::new(3, Duration::ZERO),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempts_time_out_and_retry() {
        let mut generator = Scripted::new(vec![Ok("late".to_string())]);
        generator.latency = Duration::from_secs(10);
        let policy = RetryPolicy::new(2, Duration::from_millis(100))
            .with_attempt_timeout(Duration::from_secs(1));

        let result = run(&generator, &policy).await;

        assert_eq!(generator.calls(), 2);
        assert_eq!(
            result,
            Err(GenerationError::Exhausted {
                attempts: 2,
                last: UpstreamError::Timeout(Duration::from_secs(1)),
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_backoff() {
        let generator = Scripted::new(vec![overloaded()]);
        let cancel = CancellationToken::new();
        let policy = RetryPolicy::new(10, Duration::from_secs(60));

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            trigger.cancel();
        });

        let mut session = ChatSession::new();
        let err = generate_with_retry(
            &generator,
            &mut session,
            "prompt",
            &GenerationConfig::default(),
            &policy,
            &cancel,
        )
        .await
        .unwrap_err();

        assert_eq!(generator.calls(), 1);
        assert_eq!(err.upstream(), &UpstreamError::Cancelled);
    }

    #[test]
    fn test_policy_from_config() {
        let mut config = AppConfig::default();
        config.retry_max_attempts = 0;
        config.retry_delay_ms = 500;

        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.delay, Duration::from_millis(500));
    }
}
