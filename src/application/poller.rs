//! Terminal-state poller.
//!
//! Quotations, shipments and pickups are created asynchronously by the
//! carrier. The poller re-fetches a resource with exponential backoff until a
//! predicate says it has settled or the attempt budget runs out. It never
//! fails: a fetch error ends the loop and is handed back next to the last
//! known value.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::config::PollPolicyConfig;

/// Attempt budget and initial delay. Attempt `n` waits `initial_delay * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Sleep before the given zero-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Worst-case time spent sleeping: `initial_delay * (2^max_attempts - 1)`.
    pub fn max_total_wait(&self) -> Duration {
        (0..self.max_attempts)
            .map(|attempt| self.delay_for(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(1))
    }
}

impl From<PollPolicyConfig> for PollPolicy {
    fn from(config: PollPolicyConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.initial_delay_ms))
    }
}

/// How a poll ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<R, E> {
    /// The predicate accepted `value` after `attempts` fetches.
    Terminal { value: R, attempts: u32 },
    /// The budget ran out; `value` is the last observed state.
    Exhausted { value: R, attempts: u32 },
    /// A fetch failed; `value` is the last state observed before it.
    Aborted { value: R, attempts: u32, error: E },
}

impl<R, E> PollOutcome<R, E> {
    pub fn value(&self) -> &R {
        match self {
            PollOutcome::Terminal { value, .. }
            | PollOutcome::Exhausted { value, .. }
            | PollOutcome::Aborted { value, .. } => value,
        }
    }

    pub fn into_value(self) -> R {
        match self {
            PollOutcome::Terminal { value, .. }
            | PollOutcome::Exhausted { value, .. }
            | PollOutcome::Aborted { value, .. } => value,
        }
    }

    /// Number of fetches performed, including a failed one.
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Terminal { attempts, .. }
            | PollOutcome::Exhausted { attempts, .. }
            | PollOutcome::Aborted { attempts, .. } => *attempts,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PollOutcome::Terminal { .. })
    }
}

/// Backoff loop shared by every asynchronous carrier resource.
#[derive(Debug, Clone, Copy)]
pub struct TerminalStatePoller {
    resource: &'static str,
    policy: PollPolicy,
}

impl TerminalStatePoller {
    pub fn new(resource: &'static str, policy: PollPolicy) -> Self {
        Self { resource, policy }
    }

    /// Polls until `is_terminal` holds, the budget is spent or `fetch` fails.
    ///
    /// A terminal `initial` value returns at once without sleeping or
    /// fetching.
    pub async fn poll<R, E, F, Fut, P>(
        &self,
        initial: R,
        mut fetch: F,
        is_terminal: P,
    ) -> PollOutcome<R, E>
    where
        F: FnMut(&R) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        P: Fn(&R) -> bool,
        E: Display,
    {
        let mut current = initial;
        if is_terminal(&current) {
            return PollOutcome::Terminal {
                value: current,
                attempts: 0,
            };
        }

        for attempt in 0..self.policy.max_attempts {
            let delay = self.policy.delay_for(attempt);
            tokio::time::sleep(delay).await;

            match fetch(&current).await {
                Ok(next) => current = next,
                Err(error) => {
                    tracing::warn!(
                        resource = self.resource,
                        attempt = attempt + 1,
                        error = %error,
                        "Poll fetch failed, keeping last known state"
                    );
                    return PollOutcome::Aborted {
                        value: current,
                        attempts: attempt + 1,
                        error,
                    };
                }
            }

            let settled = is_terminal(&current);
            tracing::debug!(
                resource = self.resource,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                settled,
                "Polled carrier resource"
            );
            if settled {
                return PollOutcome::Terminal {
                    value: current,
                    attempts: attempt + 1,
                };
            }
        }

        PollOutcome::Exhausted {
            value: current,
            attempts: self.policy.max_attempts,
        }
    }
}
