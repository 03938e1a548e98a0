use super::client::Transcriber;
use crate::error::TranscribeError;
use std::time::Duration;
use tracing::warn;

/// Bounded retry with exponential backoff for transient service errors.
///
/// Auth failures and malformed responses are returned immediately; only
/// errors where a retry could plausibly succeed are repeated.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first (1 = no retry)
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent one
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Single-shot behavior: fail on the first error.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff delay after the given 1-based attempt number.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Submit `audio` to the transcriber, retrying per `policy`.
pub async fn transcribe_with_retry(
    transcriber: &dyn Transcriber,
    policy: RetryPolicy,
    audio: Vec<u8>,
    filename: &str,
    language: Option<&str>,
) -> Result<String, TranscribeError> {
    let mut attempt: u32 = 1;

    loop {
        match transcriber
            .transcribe(audio.clone(), filename, language)
            .await
        {
            Ok(text) => return Ok(text),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "transcription attempt {attempt}/{} failed, retrying in {:?}: {err}",
                    policy.max_attempts, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
