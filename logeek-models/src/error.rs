//! Error types for question generation.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Errors that can occur while generating questions.
///
/// Every provider failure is classified into one of these kinds before
/// it reaches session logic, so callers never see a generic error.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The provider-side credential has hit its usage limit (HTTP 429 /
    /// RESOURCE_EXHAUSTED). Terminal for the current request.
    #[error("generation quota exceeded: the configured API key has hit its limit")]
    QuotaExceeded,

    /// The provider is temporarily overloaded or unreachable (HTTP 503).
    /// Recoverable by user retry.
    #[error("generation service unavailable: {0}")]
    Unavailable(String),

    /// The provider responded, but the payload failed strict validation
    /// (invalid JSON, missing fields, answer not among options, empty
    /// question list). Recoverable by user retry.
    #[error("malformed generator output: {0}")]
    Malformed(String),

    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("generation request failed: {0}")]
    Request(String),
}

impl GenerateError {
    /// Whether the user retrying the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Malformed(_) | Self::Request(_))
    }
}
