//! Cooperative cancellation for a single call.
//!
//! The executor checks the token between attempts only; an in-flight request
//! is never interrupted. Cancelling short-circuits a pending retry to a
//! cancelled terminal, skipping the backoff sleep and remaining attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancel flag. Clone it, hand one copy to the call and keep the
/// other to cancel from any thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
