//! Per-call record of what each attempt did.

use std::time::SystemTime;

use crate::endpoint::{Endpoint, Target};
use crate::retry::{Failure, Outcome};

/// Summary of one attempt's classification, without the response body.
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    Success(u16),
    Retryable(Failure),
    Fatal(Failure),
}

/// One attempt: which target was used and what came back.
#[derive(Debug, Clone)]
pub struct Attempt {
    /// 1-based ordinal.
    pub number: u32,
    pub target: Target,
    pub outcome: AttemptOutcome,
    pub at: SystemTime,
}

/// All attempts made for one logical call, in order. Owned by the executor
/// while the call runs; dropped with the call unless the caller asked for it.
#[derive(Debug, Clone)]
pub struct CallTrace {
    endpoint: Endpoint,
    attempts: Vec<Attempt>,
}

impl CallTrace {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            attempts: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, number: u32, target: Target, outcome: &Outcome) {
        let outcome = match outcome {
            Outcome::Success(resp) => AttemptOutcome::Success(resp.status),
            Outcome::Retryable(failure) => AttemptOutcome::Retryable(failure.clone()),
            Outcome::Fatal(failure) => AttemptOutcome::Fatal(failure.clone()),
        };
        self.attempts.push(Attempt {
            number,
            target,
            outcome,
            at: SystemTime::now(),
        });
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}
