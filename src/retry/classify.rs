//! Classify raw transport results into success / retryable / fatal.

use std::collections::BTreeSet;
use std::fmt;

use crate::transport::{HttpResponse, TransportError};

/// Which outcomes count as transient.
#[derive(Debug, Clone)]
pub struct ClassifyRules {
    /// Status codes treated as transient. Everything else outside 2xx is
    /// fatal; 4xx is never retried unless listed here explicitly.
    pub retryable_status_codes: BTreeSet<u16>,
    /// Whether timeouts and connection failures are transient. Unclassified
    /// transport errors are fatal regardless.
    pub retry_transport_errors: bool,
}

impl Default for ClassifyRules {
    fn default() -> Self {
        Self {
            retryable_status_codes: BTreeSet::from([500]),
            retry_transport_errors: true,
        }
    }
}

/// The failing result of one attempt.
#[derive(Debug, Clone)]
pub enum Failure {
    /// A response arrived with a non-2xx status.
    Status(u16),
    /// The transport failed before a status was read.
    Transport(TransportError),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Status(code) => write!(f, "HTTP {}", code),
            Failure::Transport(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Failure {}

/// Classification of one attempt's raw result.
#[derive(Debug)]
pub enum Outcome {
    /// 2xx response.
    Success(HttpResponse),
    /// Transient failure, eligible for retry under policy.
    Retryable(Failure),
    /// Non-retryable failure, surfaced immediately.
    Fatal(Failure),
}

impl Outcome {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Outcome::Retryable(_))
    }
}

/// Applies the rules to one raw result.
pub fn classify(
    result: Result<HttpResponse, TransportError>,
    rules: &ClassifyRules,
) -> Outcome {
    match result {
        Ok(resp) if (200..300).contains(&resp.status) => Outcome::Success(resp),
        Ok(resp) => {
            let failure = Failure::Status(resp.status);
            if rules.retryable_status_codes.contains(&resp.status) {
                Outcome::Retryable(failure)
            } else {
                Outcome::Fatal(failure)
            }
        }
        Err(e) => {
            let transient = matches!(
                e,
                TransportError::Timeout(_) | TransportError::Connection(_)
            );
            if transient && rules.retry_transport_errors {
                Outcome::Retryable(Failure::Transport(e))
            } else {
                Outcome::Fatal(Failure::Transport(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(status: u16) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse {
            status,
            body: Vec::new(),
        })
    }

    #[test]
    fn two_xx_is_success() {
        let rules = ClassifyRules::default();
        assert!(matches!(classify(resp(200), &rules), Outcome::Success(_)));
        assert!(matches!(classify(resp(204), &rules), Outcome::Success(_)));
    }

    #[test]
    fn default_rules_retry_only_500() {
        let rules = ClassifyRules::default();
        assert!(matches!(
            classify(resp(500), &rules),
            Outcome::Retryable(Failure::Status(500))
        ));
        assert!(matches!(
            classify(resp(502), &rules),
            Outcome::Fatal(Failure::Status(502))
        ));
        assert!(matches!(
            classify(resp(503), &rules),
            Outcome::Fatal(Failure::Status(503))
        ));
    }

    #[test]
    fn four_xx_is_fatal() {
        let rules = ClassifyRules::default();
        assert!(matches!(
            classify(resp(404), &rules),
            Outcome::Fatal(Failure::Status(404))
        ));
        assert!(matches!(
            classify(resp(403), &rules),
            Outcome::Fatal(Failure::Status(403))
        ));
    }

    #[test]
    fn custom_retryable_set_extends_retries() {
        let rules = ClassifyRules {
            retryable_status_codes: BTreeSet::from([500, 503]),
            ..ClassifyRules::default()
        };
        assert!(classify(resp(503), &rules).is_retryable());
        assert!(!classify(resp(404), &rules).is_retryable());
    }

    #[test]
    fn timeout_and_connection_retry_by_default() {
        let rules = ClassifyRules::default();
        let timeout = Err(TransportError::Timeout("28".into()));
        let refused = Err(TransportError::Connection("refused".into()));
        assert!(classify(timeout, &rules).is_retryable());
        assert!(classify(refused, &rules).is_retryable());
    }

    #[test]
    fn transport_errors_fatal_when_disabled() {
        let rules = ClassifyRules {
            retry_transport_errors: false,
            ..ClassifyRules::default()
        };
        let timeout = Err(TransportError::Timeout("28".into()));
        assert!(matches!(classify(timeout, &rules), Outcome::Fatal(_)));
    }

    #[test]
    fn unclassified_transport_errors_always_fatal() {
        let rules = ClassifyRules::default();
        let other = Err(TransportError::Other("unsupported protocol".into()));
        assert!(matches!(classify(other, &rules), Outcome::Fatal(_)));
    }
}
