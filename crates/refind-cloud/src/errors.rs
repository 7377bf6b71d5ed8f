//! Cloud client error types.
//!
//! Remote failures map onto a small fixed set of local codes; the raw
//! response body is logged server-side only and never surfaced through
//! these variants.

use thiserror::Error;

/// Errors from the cloud vision path.
#[derive(Debug, Error)]
pub enum CloudError {
    /// The request failed guard validation; no network call was made.
    #[error("request rejected: {reason}")]
    Rejected {
        /// The guard's rejection reason.
        reason: String,
    },

    /// Rejected by the local limiter or the remote returned 429.
    #[error("rate limited")]
    RateLimited,

    /// The remote returned 402 — usage credits depleted.
    #[error("payment required")]
    PaymentRequired,

    /// Any other remote failure (non-2xx, malformed body). Details are
    /// logged, not carried here.
    #[error("cloud service unavailable")]
    ServiceError,

    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CloudError {
    /// The fixed, enumerable code for this error — safe to show to clients.
    #[must_use]
    pub fn user_code(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "REJECTED",
            Self::RateLimited => "RATE_LIMITED",
            Self::PaymentRequired => "PAYMENT_REQUIRED",
            Self::ServiceError | Self::Http(_) => "SERVICE_ERROR",
        }
    }
}

/// Result alias for cloud operations.
pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_codes_are_fixed() {
        assert_eq!(
            CloudError::Rejected {
                reason: "x".into()
            }
            .user_code(),
            "REJECTED"
        );
        assert_eq!(CloudError::RateLimited.user_code(), "RATE_LIMITED");
        assert_eq!(CloudError::PaymentRequired.user_code(), "PAYMENT_REQUIRED");
        assert_eq!(CloudError::ServiceError.user_code(), "SERVICE_ERROR");
    }

    #[test]
    fn service_error_display_carries_no_detail() {
        let msg = CloudError::ServiceError.to_string();
        assert_eq!(msg, "cloud service unavailable");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CloudError>();
    }
}
