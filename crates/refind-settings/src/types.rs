//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` to match the JSON wire
//! format of the app shell. Each type implements [`Default`] with production
//! default values. `#[serde(default)]` allows partial JSON — missing fields
//! get their default value during deserialization.

use serde::{Deserialize, Serialize};

/// Root settings type for the refind pipeline.
///
/// Loaded from `~/.refind/settings.json` with defaults applied for missing
/// fields. `REFIND_*` environment variables can override specific values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefindSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Embedding model settings.
    pub embedding: EmbeddingSettings,
    /// Search/teach session settings.
    pub session: SessionSettings,
    /// Audio/haptic guidance settings.
    pub guidance: GuidanceSettings,
    /// Cloud fallback endpoint settings.
    pub cloud: CloudSettings,
    /// Sliding-window rate limits for safety-critical operations.
    pub limits: RateLimitSettings,
    /// Minimum log level when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for RefindSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_owned(),
            name: "refind".to_owned(),
            embedding: EmbeddingSettings::default(),
            session: SessionSettings::default(),
            guidance: GuidanceSettings::default(),
            cloud: CloudSettings::default(),
            limits: RateLimitSettings::default(),
            log_level: "warn".to_owned(),
        }
    }
}

/// Embedding model configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbeddingSettings {
    /// Hugging Face repository holding the ONNX model.
    pub model_repo: String,
    /// Model file within the repository.
    pub model_file: String,
    /// Square input resolution expected by the model.
    pub input_size: u32,
    /// Output embedding dimensionality.
    pub dimensions: usize,
    /// Local model cache directory (may contain `~`).
    pub cache_dir: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model_repo: "Xenova/mobilenet_v2_1.0_224".to_owned(),
            model_file: "onnx/model.onnx".to_owned(),
            input_size: 224,
            dimensions: 1280,
            cache_dir: "~/.refind/models".to_owned(),
        }
    }
}

/// Session timing and quota configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Frame-processing rate while searching (ticks per second).
    pub tick_rate_hz: u32,
    /// Hard ceiling on a search session, in seconds.
    pub timeout_secs: u64,
    /// Maximum number of learned items before teaching is blocked.
    pub item_quota: usize,
    /// Suggested number of teaching photos per item.
    pub teach_photo_target: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: 8,
            timeout_secs: 60,
            item_quota: 1,
            teach_photo_target: 12,
        }
    }
}

/// Guidance output configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuidanceSettings {
    /// Whether directional earcons and speech are produced.
    pub audio_enabled: bool,
    /// Whether vibration patterns are produced on capable devices.
    pub haptics_enabled: bool,
    /// Probability of a spoken phrase accompanying a tick's earcon.
    pub voice_probability: f64,
}

impl Default for GuidanceSettings {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            haptics_enabled: true,
            voice_probability: 0.2,
        }
    }
}

/// Cloud fallback endpoint configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudSettings {
    /// Base URL of the chat-completion-style gateway.
    pub base_url: String,
    /// Multimodal model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Response token cap.
    pub max_tokens: u32,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            base_url: "https://ai.gateway.lovable.dev/v1".to_owned(),
            model: "google/gemini-2.5-flash".to_owned(),
            temperature: 0.3,
            max_tokens: 150,
            timeout_ms: 30_000,
        }
    }
}

/// One sliding-window rate limit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowLimit {
    /// Maximum calls permitted within the trailing window.
    pub max_calls: usize,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for WindowLimit {
    fn default() -> Self {
        Self {
            max_calls: 10,
            window_secs: 60,
        }
    }
}

/// Rate limits per operation class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitSettings {
    /// Cloud vision/chat requests.
    pub cloud_requests: WindowLimit,
    /// Item-label safety checks.
    pub item_label_checks: WindowLimit,
    /// Text-to-speech dispatches.
    pub tts_speak: WindowLimit,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            cloud_requests: WindowLimit {
                max_calls: 10,
                window_secs: 60,
            },
            item_label_checks: WindowLimit {
                max_calls: 20,
                window_secs: 300,
            },
            tts_speak: WindowLimit {
                max_calls: 30,
                window_secs: 60,
            },
        }
    }
}
