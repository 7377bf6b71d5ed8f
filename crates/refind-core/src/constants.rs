//! Pipeline-wide constants.

/// Current version of the refind pipeline (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "refind";

/// Minimum cosine similarity for a live frame to count as a match.
///
/// Scores below this are indistinguishable from background noise and are
/// reported as "no detection".
pub const MATCH_THRESHOLD: f32 = 0.6;

/// Similarity above which the dispatcher announces the item as found.
pub const HIGH_CONFIDENCE_THRESHOLD: f32 = 0.85;

/// Ceiling on a single search session, bounding battery and thermal cost.
pub const SESSION_TIMEOUT_SECS: u64 = 60;

/// Default frame-processing rate while searching.
pub const DEFAULT_TICK_RATE_HZ: u32 = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_semver() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3, "VERSION must be semver (MAJOR.MINOR.PATCH)");
        for part in parts {
            let _: u32 = part.parse().expect("each semver segment must be a number");
        }
    }

    #[test]
    fn thresholds_are_ordered() {
        assert!(MATCH_THRESHOLD < HIGH_CONFIDENCE_THRESHOLD);
        assert!(HIGH_CONFIDENCE_THRESHOLD < 1.0);
    }

    #[test]
    fn tick_rate_is_positive() {
        assert!(DEFAULT_TICK_RATE_HZ > 0);
    }
}
