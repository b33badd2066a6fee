//! Retry/backoff policy: pure decision over (attempt, classification).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::classify::Outcome;

fn default_max_delay_ms() -> u64 {
    30_000
}

/// Delay strategy between attempts. Fixed zero is the default so test runs
/// stay deterministic; exponential is capped like any sane backoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Backoff {
    Fixed {
        delay_ms: u64,
    },
    Exponential {
        base_ms: u64,
        factor: f64,
        #[serde(default = "default_max_delay_ms")]
        max_delay_ms: u64,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Fixed { delay_ms: 0 }
    }
}

impl Backoff {
    /// Delay to wait after the given 1-based attempt fails.
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed { delay_ms } => Duration::from_millis(delay_ms),
            Backoff::Exponential {
                base_ms,
                factor,
                max_delay_ms,
            } => {
                let exp = factor.max(1.0).powi(attempt.saturating_sub(1).min(32) as i32);
                let ms = (base_ms as f64 * exp).min(max_delay_ms as f64);
                Duration::from_millis(ms as u64)
            }
        }
    }
}

/// Decision for one attempt. Produced fresh per attempt, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again after the delay.
    RetryAfter(Duration),
    /// Stop; the attempt's outcome is final.
    GiveUp,
}

/// Retry budget and backoff for one logical call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first. Must be >= 1.
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::default(),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after `attempt` (1-based) produced `outcome`.
    ///
    /// Success and fatal outcomes give up immediately without consulting the
    /// budget; a retryable outcome retries while budget remains.
    pub fn decide(&self, attempt: u32, outcome: &Outcome) -> RetryDecision {
        match outcome {
            Outcome::Success(_) | Outcome::Fatal(_) => RetryDecision::GiveUp,
            Outcome::Retryable(_) => {
                if attempt < self.max_attempts {
                    RetryDecision::RetryAfter(self.backoff.delay(attempt))
                } else {
                    RetryDecision::GiveUp
                }
            }
        }
    }
}
