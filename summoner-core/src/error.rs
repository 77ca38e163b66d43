//! Error types for Summoner operations

/// Result type for Summoner operations
pub type Result<T> = std::result::Result<T, SummonerError>;

/// Error types for the assistant
#[derive(Debug, thiserror::Error)]
pub enum SummonerError {
    /// Champion, ability or other subject could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// An external service answered with an error or could not be reached
    #[error("{service} unavailable{}: {message}", fmt_status(.status))]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// An outbound call exceeded its time budget
    #[error("{service} timed out")]
    Timeout { service: &'static str },

    /// The session was cancelled while a call was in flight
    #[error("Operation cancelled")]
    Cancelled,

    /// Query rejected before any processing (empty, too short)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Upstream payload did not have the expected shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Stat enrichment could not derive values from a record
    #[error("Enrichment error: {0}")]
    Enrichment(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl SummonerError {
    /// Build an upstream error from an HTTP status.
    pub fn upstream_status(service: &'static str, status: u16, message: impl Into<String>) -> Self {
        SummonerError::Upstream {
            service,
            status: Some(status),
            message: message.into(),
        }
    }

    /// Build an upstream error for a transport failure (no status received).
    pub fn upstream_transport(service: &'static str, message: impl Into<String>) -> Self {
        SummonerError::Upstream {
            service,
            status: None,
            message: message.into(),
        }
    }

    /// Whether a retry has a chance of succeeding.
    ///
    /// Transport failures, timeouts, 429 and 5xx are transient. Every other
    /// status, missing records and bad payloads are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            SummonerError::Upstream { status: None, .. } => true,
            SummonerError::Upstream {
                status: Some(status),
                ..
            } => *status == 429 || (500..600).contains(status),
            SummonerError::Timeout { .. } => true,
            _ => false,
        }
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SummonerError::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<String> for SummonerError {
    fn from(s: String) -> Self {
        SummonerError::Other(s)
    }
}

impl From<&str> for SummonerError {
    fn from(s: &str) -> Self {
        SummonerError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(SummonerError::upstream_transport("data dragon", "connection reset").is_retryable());
        assert!(SummonerError::upstream_status("inference", 503, "busy").is_retryable());
        assert!(SummonerError::upstream_status("inference", 429, "slow down").is_retryable());
        assert!(SummonerError::Timeout { service: "inference" }.is_retryable());

        assert!(!SummonerError::upstream_status("inference", 401, "bad token").is_retryable());
        assert!(!SummonerError::upstream_status("data dragon", 404, "missing").is_retryable());
        assert!(!SummonerError::NotFound("xyzzy".into()).is_retryable());
        assert!(!SummonerError::Cancelled.is_retryable());
    }

    #[test]
    fn test_upstream_display() {
        let err = SummonerError::upstream_status("inference", 503, "model loading");
        assert_eq!(err.to_string(), "inference unavailable (503): model loading");

        let err = SummonerError::upstream_transport("data dragon", "dns failure");
        assert_eq!(err.to_string(), "data dragon unavailable: dns failure");
    }
}
