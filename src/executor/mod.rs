//! Call executor: resolve, send, classify, decide, loop.
//!
//! One executor is bound to a fixed endpoint descriptor and request template
//! and runs the whole resolve -> send -> classify -> decide cycle per
//! attempt. The loop is the only place retry decisions happen, and it never
//! inspects how the endpoint was addressed: a literal URL walks through
//! exactly the same resolution and decision steps as a service name. Wiring
//! retry anywhere else (the resolver, say) is how a literal-URL client
//! silently loses its retries.

mod trace;

pub use trace::{Attempt, AttemptOutcome, CallTrace};

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use thiserror::Error;

use crate::control::CancelToken;
use crate::endpoint::Endpoint;
use crate::resolver::{Resolve, ResolveError, StaticResolver};
use crate::retry::{classify, ClassifyRules, Failure, Outcome, RetryDecision, RetryPolicy};
use crate::transport::{CurlTransport, HttpRequest, HttpResponse, Method, Transport};

/// Terminal error for one logical call. Exactly one of these (or a success
/// response) surfaces to the caller; intermediate attempts never do.
#[derive(Debug, Error)]
pub enum CallError {
    /// The endpoint could not be resolved to an address. Surfaced
    /// immediately, never retried.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// A non-retryable outcome on some attempt.
    #[error("fatal failure on attempt {attempt}: {failure}")]
    Fatal { attempt: u32, failure: Failure },
    /// The retry budget ran out; wraps the last transient failure.
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Failure },
    /// The call was cancelled between attempts.
    #[error("call cancelled")]
    Cancelled,
}

/// Builder for a call executor bound to one endpoint. Replaces what the
/// declarative-client world does with annotated interfaces: everything is
/// fixed up front, nothing is dispatched at runtime.
pub struct CallBuilder {
    endpoint: Endpoint,
    method: Method,
    path: String,
    headers: HashMap<String, String>,
    policy: RetryPolicy,
    rules: ClassifyRules,
    resolver: Option<Arc<dyn Resolve + Send + Sync>>,
    transport: Option<Arc<dyn Transport + Send + Sync>>,
    cancel: Option<CancelToken>,
}

impl CallBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Template path appended to every resolved base URL. Leave empty when a
    /// literal endpoint already carries its path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn rules(mut self, rules: ClassifyRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn Resolve + Send + Sync>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport + Send + Sync>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validates the configuration and builds the executor. Only malformed
    /// configuration can fail here.
    pub fn build(self) -> anyhow::Result<CallExecutor> {
        if self.policy.max_attempts < 1 {
            anyhow::bail!("max_attempts must be >= 1");
        }
        Ok(CallExecutor {
            endpoint: self.endpoint,
            method: self.method,
            path: self.path,
            headers: self.headers,
            policy: self.policy,
            rules: self.rules,
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::new(StaticResolver::default())),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(CurlTransport::default())),
            cancel: self.cancel,
        })
    }
}

/// Executes one logical call per `run`, retrying transient failures under
/// the policy. Reusable and safe to share across threads; each run is an
/// independent sequential loop on the calling thread.
pub struct CallExecutor {
    endpoint: Endpoint,
    method: Method,
    path: String,
    headers: HashMap<String, String>,
    policy: RetryPolicy,
    rules: ClassifyRules,
    resolver: Arc<dyn Resolve + Send + Sync>,
    transport: Arc<dyn Transport + Send + Sync>,
    cancel: Option<CancelToken>,
}

impl CallExecutor {
    /// Starts a builder bound to the given endpoint.
    pub fn to(endpoint: Endpoint) -> CallBuilder {
        CallBuilder {
            endpoint,
            method: Method::Get,
            path: String::new(),
            headers: HashMap::new(),
            policy: RetryPolicy::default(),
            rules: ClassifyRules::default(),
            resolver: None,
            transport: None,
            cancel: None,
        }
    }

    /// Runs the call to completion: the final response or terminal error.
    pub fn run(&self) -> Result<HttpResponse, CallError> {
        self.run_with_trace().0
    }

    /// Like `run`, also returning the attempt-by-attempt trace.
    pub fn run_with_trace(&self) -> (Result<HttpResponse, CallError>, CallTrace) {
        let mut trace = CallTrace::new(self.endpoint.clone());
        let mut attempt = 1u32;
        loop {
            // Resolve fresh every attempt so a named endpoint may land on a
            // different instance after a failure.
            let target = match self.resolver.resolve(&self.endpoint) {
                Ok(target) => target,
                Err(e) => {
                    tracing::warn!(endpoint = %self.endpoint, error = %e, "resolution failed");
                    return (Err(CallError::Resolve(e)), trace);
                }
            };

            let request = HttpRequest {
                method: self.method,
                url: target.request_url(&self.path),
                headers: self.headers.clone(),
            };
            tracing::debug!(attempt, url = %request.url, "sending request");
            let result = self.transport.send(&request);

            let outcome = classify(result, &self.rules);
            trace.record(attempt, target, &outcome);

            match self.policy.decide(attempt, &outcome) {
                RetryDecision::GiveUp => {
                    return (self.finish(attempt, outcome), trace);
                }
                RetryDecision::RetryAfter(delay) => {
                    if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
                        tracing::debug!(attempt, "cancelled between attempts");
                        return (Err(CallError::Cancelled), trace);
                    }
                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying"
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }

    fn finish(&self, attempt: u32, outcome: Outcome) -> Result<HttpResponse, CallError> {
        match outcome {
            Outcome::Success(resp) => Ok(resp),
            Outcome::Fatal(failure) => {
                tracing::warn!(attempt, %failure, "fatal failure");
                Err(CallError::Fatal { attempt, failure })
            }
            Outcome::Retryable(last) => {
                tracing::warn!(attempts = attempt, %last, "retries exhausted");
                Err(CallError::RetriesExhausted {
                    attempts: attempt,
                    last,
                })
            }
        }
    }
}
