//! # refind-settings
//!
//! Layered configuration for the refind pipeline.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`RefindSettings::default()`]
//! 2. **User file** — `~/.refind/settings.json` (merged over defaults)
//! 3. **Environment variables** — `REFIND_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use refind_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("tick rate: {} Hz", settings.session.tick_rate_hz);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{apply_env_overrides, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton.
///
/// Initialized on first access via [`get_settings`]. If loading fails,
/// compiled defaults are used.
static SETTINGS: OnceLock<RefindSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.refind/settings.json` with env var
/// overrides. On subsequent calls, returns the cached value.
pub fn get_settings() -> &'static RefindSettings {
    SETTINGS.get_or_init(|| load_settings().unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// # Errors
///
/// Returns the provided settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: RefindSettings) -> std::result::Result<(), RefindSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = RefindSettings::default();
        let _path = settings_path();
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = RefindSettings::default();
        assert_eq!(settings.name, "refind");
        assert_eq!(settings.session.tick_rate_hz, 8);
        assert_eq!(settings.session.timeout_secs, 60);
        assert_eq!(settings.embedding.input_size, 224);
        assert_eq!(settings.limits.cloud_requests.max_calls, 10);
    }
}
