//! Error taxonomy for remote collection calls

/// Error from one GraphQL API call.
///
/// Only enumerated kinds are retried: transport failures, rate-limit and
/// server-side HTTP statuses, and malformed payloads (upstream eventual
/// consistency can hand back half-formed pages). Everything else fails fast.
#[derive(Debug)]
pub enum ApiError {
    /// Transport or HTTP-status failure. `status` is `None` for pure
    /// network errors (connection refused, timeout).
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Response arrived but did not have the expected shape.
    Malformed(String),
    /// The endpoint answered with GraphQL-level errors.
    GraphQL(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Malformed(msg) => write!(f, "malformed response: {msg}"),
            Self::GraphQL(msg) => write!(f, "GraphQL error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create an HTTP error from a reqwest error
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => match status {
                // Network error without a status (reset, timeout)
                None => true,
                Some(408 | 429) => true,
                Some(s) => (500..=599).contains(s),
            },
            // Missing fields can be transient upstream inconsistency
            Self::Malformed(_) => true,
            // Query/schema/auth problems won't fix themselves
            Self::GraphQL(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_err(status: u16) -> ApiError {
        ApiError::Http {
            status: Some(status),
            message: "test".to_string(),
        }
    }

    #[test]
    fn http_500_retryable() {
        assert!(http_err(500).is_retryable());
    }

    #[test]
    fn http_502_retryable() {
        assert!(http_err(502).is_retryable());
    }

    #[test]
    fn http_429_retryable() {
        assert!(http_err(429).is_retryable());
    }

    #[test]
    fn http_408_retryable() {
        assert!(http_err(408).is_retryable());
    }

    #[test]
    fn http_401_not_retryable() {
        assert!(!http_err(401).is_retryable());
    }

    #[test]
    fn http_403_not_retryable() {
        assert!(!http_err(403).is_retryable());
    }

    #[test]
    fn http_404_not_retryable() {
        assert!(!http_err(404).is_retryable());
    }

    #[test]
    fn http_none_status_retryable() {
        // Network error without status code should be retryable
        let err = ApiError::Http {
            status: None,
            message: "connection refused".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn malformed_retryable() {
        let err = ApiError::Malformed("missing pageInfo".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn graphql_not_retryable() {
        let err = ApiError::GraphQL("Could not resolve to a Repository".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn display_http_with_status() {
        let err = http_err(404);
        assert_eq!(format!("{err}"), "HTTP 404: test");
    }

    #[test]
    fn display_http_without_status() {
        let err = ApiError::Http {
            status: None,
            message: "timeout".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP error: timeout");
    }

    #[test]
    fn display_malformed() {
        let err = ApiError::Malformed("no data".to_string());
        assert!(format!("{err}").contains("malformed"));
    }

    #[test]
    fn display_graphql() {
        let err = ApiError::GraphQL("rate limited".to_string());
        assert!(format!("{err}").contains("GraphQL"));
    }
}
