use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use super::ModelTransport;
use crate::error::GenerationError;

pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES, RETRY_DELAY)
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Linear backoff: the wait after attempt `n` is `base_delay * n`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Per-request retry bookkeeping. Lives only for one `invoke` call.
#[derive(Debug, Default)]
pub struct GenerationContext {
    pub attempt: u32,
    pub last_error: Option<GenerationError>,
    pub total_backoff: Duration,
}

/// Successful result plus how much it cost to get there.
#[derive(Debug)]
pub struct Invocation<T> {
    pub value: T,
    pub attempts: u32,
    pub total_backoff: Duration,
}

#[derive(Debug, Clone)]
pub struct ModelInvoker {
    transport: Arc<dyn ModelTransport>,
    policy: RetryPolicy,
}

impl ModelInvoker {
    pub fn new(transport: Arc<dyn ModelTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Raw generated text, retried on transient failures.
    pub async fn invoke(&self, instruction: &str) -> Result<Invocation<String>, GenerationError> {
        self.invoke_with(instruction, Ok).await
    }

    /// Like [`invoke`](Self::invoke), but runs `accept` on each attempt's text.
    /// A retryable error from `accept` consumes an attempt the same way a
    /// transport failure does.
    pub async fn invoke_with<T, F>(
        &self,
        instruction: &str,
        mut accept: F,
    ) -> Result<Invocation<T>, GenerationError>
    where
        F: FnMut(String) -> Result<T, GenerationError> + Send,
        T: Send,
    {
        if !self.transport.is_configured() {
            return Err(GenerationError::Configuration(format!(
                "{} provider credentials are not configured",
                self.transport.provider_name()
            )));
        }

        let mut ctx = GenerationContext::default();

        while ctx.attempt < self.policy.max_attempts {
            ctx.attempt += 1;

            let outcome = match self.transport.generate(instruction).await {
                Ok(text) => accept(text),
                Err(err) => Err(err.into()),
            };

            let err = match outcome {
                Ok(value) => {
                    debug!(
                        provider = self.transport.provider_name(),
                        attempt = ctx.attempt,
                        "generation succeeded"
                    );
                    return Ok(Invocation {
                        value,
                        attempts: ctx.attempt,
                        total_backoff: ctx.total_backoff,
                    });
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => err,
            };

            warn!(
                provider = self.transport.provider_name(),
                attempt = ctx.attempt,
                max_attempts = self.policy.max_attempts,
                error = %err,
                "generation attempt failed"
            );
            ctx.last_error = Some(err);

            if ctx.attempt < self.policy.max_attempts {
                let delay = self.policy.delay_for(ctx.attempt);
                tokio::time::sleep(delay).await;
                ctx.total_backoff += delay;
            }
        }

        let last_error = ctx
            .last_error
            .unwrap_or_else(|| GenerationError::Internal("no attempt was made".into()));

        Err(GenerationError::Exhausted {
            attempts: ctx.attempt,
            last_error: Box::new(last_error),
        })
    }
}
