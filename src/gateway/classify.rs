//! Classification of completion-service failures.
//!
//! Failures are sorted into three kinds by message content. The kind picks
//! the degraded-but-valid content returned to the caller; nothing here
//! retries anything.

use super::client::CompletionError;

/// Upstream failure classes, in spec order of specificity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Message mentions "429" or "quota".
    RateLimited,
    /// Message mentions "api key" or "authentication".
    AuthFailure,
    /// Everything else, including timeouts.
    Transient,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::AuthFailure => "auth_failure",
            Self::Transient => "transient",
        }
    }
}

/// Classify a completion error by its rendered message.
pub fn classify(error: &CompletionError) -> FailureKind {
    let message = error.to_string().to_lowercase();
    if message.contains("429") || message.contains("quota") {
        FailureKind::RateLimited
    } else if message.contains("api key") || message.contains("authentication") {
        FailureKind::AuthFailure
    } else {
        FailureKind::Transient
    }
}
