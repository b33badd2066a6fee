//! Retry decision-making: outcome classification and the retry/backoff
//! policy.
//!
//! Both halves are pure. The classifier maps a raw transport result to
//! success / retryable / fatal under configurable rules; the policy turns an
//! attempt number and a classification into retry-after-delay or give-up.
//! Neither half knows how the call target was addressed, which is what keeps
//! retry behavior identical for named services and literal URLs.

mod classify;
mod policy;

pub use classify::{classify, ClassifyRules, Failure, Outcome};
pub use policy::{Backoff, RetryDecision, RetryPolicy};
