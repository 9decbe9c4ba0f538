//! Retry wrapper for outbound assistant calls.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use skyguide_assistant::AssistantError;

/// Delay before the first re-attempt; doubles on each subsequent one.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(300);

/// Hard cap on total attempts regardless of what the client asked for.
const MAX_TOTAL_ATTEMPTS: usize = 5;

/// How many attempts each outbound call gets and how long to wait
/// between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total invocations of the operation, the first one included.
    pub max_attempts: usize,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    /// Derive a policy from the retry count a client sent along.
    ///
    /// Clients get two attempts of headroom on top of what they asked
    /// for, capped at five attempts total.
    pub fn for_request(requested_retries: u32, initial_delay: Duration) -> Self {
        let max_attempts = (requested_retries as usize + 2).min(MAX_TOTAL_ATTEMPTS);
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Exponential backoff matching this policy: `initial_delay`
    /// doubling per re-attempt, no jitter, one delay fewer than the
    /// attempt count.
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_factor(2.0)
            .with_max_times(self.max_attempts.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::for_request(0, DEFAULT_INITIAL_DELAY)
    }
}

/// Run `operation`, re-invoking it on transient assistant failures until
/// it succeeds or the policy's attempt budget is spent.
///
/// Non-transient failures (auth errors, 4xx other than 429) are returned
/// immediately without consuming any budget.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &'static str,
    operation: F,
) -> Result<T, AssistantError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AssistantError>>,
{
    operation
        .retry(policy.backoff())
        .when(AssistantError::is_transient)
        .notify(move |err: &AssistantError, delay: Duration| {
            tracing::warn!(
                operation = operation_name,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Transient assistant failure, retrying"
            );
        })
        .await
}
