//! API client error types

use thiserror::Error;

/// Error type for platform API operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Authentication rejected (status {0})")]
    AuthRejected(u16),

    #[error("Invalid JSON in response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Mock refused request: {0}")]
    MockRefused(String),
}

impl ApiError {
    /// Whether the failure is a timeout, which load recording treats as a
    /// failed sample rather than anything fatal
    pub fn is_timeout(&self) -> bool {
        match self {
            ApiError::Timeout(_) => true,
            ApiError::Network(e) => e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_classification() {
        assert!(ApiError::Timeout(10_000).is_timeout());
        assert!(!ApiError::InvalidUrl("nope".into()).is_timeout());
        assert!(!ApiError::AuthRejected(401).is_timeout());
    }
}
