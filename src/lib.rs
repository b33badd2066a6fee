//! Uniform-retry HTTP call executor.
//!
//! A call target is either a logical service name (resolved to an instance
//! per attempt) or a literal URL; both run through the same
//! resolve -> send -> classify -> decide loop, so retry behavior never
//! depends on how the endpoint was addressed.

pub mod config;
pub mod control;
pub mod endpoint;
pub mod executor;
pub mod logging;
pub mod resolver;
pub mod retry;
pub mod transport;

pub use control::CancelToken;
pub use endpoint::Endpoint;
pub use executor::{CallError, CallExecutor};
pub use resolver::{Resolve, ResolveError, StaticResolver};
pub use retry::{Backoff, ClassifyRules, Failure, RetryPolicy};
pub use transport::{HttpResponse, Method, Transport};
