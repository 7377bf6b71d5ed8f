//! # refind-guard
//!
//! Safety guardrails around the cloud-assisted vision path.
//!
//! - [`validate`] — consent gate, task allowlist, and content filtering for
//!   [`CloudRequest`]s, applied in a fixed order with first-failure-wins
//! - [`sanitize_input`] / [`sanitize_tts_output`] — redaction and length
//!   bounding for text entering the cloud path or speech synthesis
//! - [`is_illegal_item_label`] — keeps the teach/search flow from being used
//!   to locate contraband
//! - [`RateLimiter`] — sliding-window limiting keyed by operation name
//! - [`safe_error_message`] — generic client-visible error text
//!
//! Validation failures are values, never errors; rate-limit rejections are
//! booleans the caller must back off on.

#![deny(unsafe_code)]

pub mod patterns;
pub mod rate_limit;
pub mod safe_error;
pub mod sanitize;
pub mod validate;

pub use patterns::{ILLEGAL_ITEM_LABELS, REDACTION_MARKER};
pub use rate_limit::RateLimiter;
pub use safe_error::{SAFE_MESSAGES, safe_error_message};
pub use sanitize::{sanitize_input, sanitize_tts_output};
pub use validate::{
    ALLOWED_TASKS, CloudRequest, Validation, contains_harassment, contains_prompt_injection,
    is_illegal_item_label, is_task_allowed, validate,
};

/// Well-known rate limiter keys.
pub mod keys {
    /// Cloud vision/chat requests.
    pub const CLOUD_REQUESTS: &str = "cloud_requests";
    /// Item-label safety checks.
    pub const ITEM_LABEL_CHECKS: &str = "item_label_checks";
    /// Text-to-speech dispatches.
    pub const TTS_SPEAK: &str = "tts_speak";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn operation_classes_limit_independently() {
        // item-label checks: 20 per 5 minutes
        let limiter = RateLimiter::new(20, Duration::from_secs(300));
        let now = Instant::now();
        for _ in 0..20 {
            assert!(limiter.is_allowed_at(keys::ITEM_LABEL_CHECKS, now));
        }
        assert!(!limiter.is_allowed_at(keys::ITEM_LABEL_CHECKS, now));
        // a different operation class is unaffected
        assert!(limiter.is_allowed_at(keys::TTS_SPEAK, now));
    }

    #[test]
    fn guarded_label_check_flow() {
        let limiter = RateLimiter::new(20, Duration::from_secs(300));
        let label = "my keys";
        assert!(limiter.is_allowed(keys::ITEM_LABEL_CHECKS));
        assert!(!is_illegal_item_label(label));
    }
}
