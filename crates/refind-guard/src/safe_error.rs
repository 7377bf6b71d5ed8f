//! User-safe error messages.
//!
//! Internal error text, stack traces, and configuration values must never
//! reach the client-visible error path. Any internal failure is replaced by
//! one of a small set of generic messages, selected arbitrarily.

use rand::Rng as _;
use tracing::error;

/// The fixed set of client-visible messages.
pub const SAFE_MESSAGES: &[&str] = &[
    "Unable to process request at this time.",
    "Service temporarily unavailable. Please try again.",
    "Request could not be completed safely.",
    "Processing error. Please contact support if this persists.",
];

/// Produce a user-safe message for an internal error.
///
/// The original error is logged and discarded; the returned text carries no
/// information about it.
pub fn safe_error_message(original: &str) -> &'static str {
    error!(error = original, "internal error replaced with safe message");
    let index = rand::rng().random_range(0..SAFE_MESSAGES.len());
    SAFE_MESSAGES[index]
}
