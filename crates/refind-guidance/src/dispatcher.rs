//! Turning a search result into audio and haptic output.
//!
//! Safe to call every tick: the earcon is fire-and-forget, speech is
//! cancel-and-replace, and haptics only fire on capable devices.

use std::sync::Arc;

use tracing::debug;

use refind_core::{HIGH_CONFIDENCE_THRESHOLD, SearchResult};

use crate::cues::{guidance_phrase, haptic_pattern, intensity_for, pan_for};
use crate::devices::{EarconSink, HapticActuator, SpeechSynthesizer};

/// Uniform random source for the occasional-voice cadence.
///
/// Injected so tests can force the spoken branch on or off.
pub trait ProbabilitySource: Send + Sync {
    /// A uniform sample from `[0, 1)`.
    fn roll(&self) -> f64;
}

/// Production source backed by the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRngProbability;

impl ProbabilitySource for ThreadRngProbability {
    fn roll(&self) -> f64 {
        rand::random::<f64>()
    }
}

/// Fixed source for tests: always returns the configured value.
#[derive(Clone, Copy, Debug)]
pub struct FixedProbability(pub f64);

impl ProbabilitySource for FixedProbability {
    fn roll(&self) -> f64 {
        self.0
    }
}

/// Per-call user toggles.
#[derive(Clone, Copy, Debug)]
pub struct GuidancePrefs {
    /// Earcons and speech.
    pub audio_enabled: bool,
    /// Vibration patterns.
    pub haptics_enabled: bool,
}

impl Default for GuidancePrefs {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            haptics_enabled: true,
        }
    }
}

/// Dispatches directional cues, occasional voice guidance, haptic patterns,
/// and the high-confidence found announcement.
pub struct GuidanceDispatcher {
    earcon: Arc<dyn EarconSink>,
    speech: Arc<dyn SpeechSynthesizer>,
    haptics: Arc<dyn HapticActuator>,
    probability: Arc<dyn ProbabilitySource>,
    voice_probability: f64,
}

impl GuidanceDispatcher {
    /// Create a dispatcher over the given output devices.
    #[must_use]
    pub fn new(
        earcon: Arc<dyn EarconSink>,
        speech: Arc<dyn SpeechSynthesizer>,
        haptics: Arc<dyn HapticActuator>,
        probability: Arc<dyn ProbabilitySource>,
        voice_probability: f64,
    ) -> Self {
        Self {
            earcon,
            speech,
            haptics,
            probability,
            voice_probability,
        }
    }

    /// Announce one detection. Side-effecting; each cue is attempted
    /// independently and respects the user toggles.
    pub fn announce(&self, result: &SearchResult, item_name: Option<&str>, prefs: &GuidancePrefs) {
        if prefs.audio_enabled {
            let pan = pan_for(result.direction);
            let intensity = intensity_for(result.distance);
            debug!(pan, intensity, "directional earcon");
            self.earcon.play_directional(pan, intensity);

            // occasional voice guidance alongside the earcon
            if self.probability.roll() < self.voice_probability {
                self.speech
                    .speak(&guidance_phrase(result.direction, result.distance));
            }
        }

        if prefs.haptics_enabled && self.haptics.supports_vibration() {
            self.haptics.vibrate(haptic_pattern(result.distance));
        }

        if prefs.audio_enabled && result.confidence > HIGH_CONFIDENCE_THRESHOLD {
            let name = item_name.unwrap_or("item");
            self.speech.speak(&format!("Found {name}"));
        }
    }

    /// Announce that a search session has started.
    pub fn announce_search_started(&self, item_name: &str, prefs: &GuidancePrefs) {
        if prefs.audio_enabled {
            self.speech.speak(&format!("Searching for {item_name}"));
        }
    }

    /// Announce that the session has stopped and silence pending speech.
    pub fn announce_search_stopped(&self, prefs: &GuidancePrefs) {
        if prefs.audio_enabled {
            self.speech.speak("Search stopped");
        } else {
            self.speech.cancel_all();
        }
    }

    /// Announce that the teach quota was reached.
    pub fn announce_quota_exceeded(&self, prefs: &GuidancePrefs) {
        if prefs.audio_enabled {
            self.speech
                .speak("Item limit reached. Delete an item to teach a new one");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{RecordingEarconSink, RecordingHaptics, RecordingSpeech};
    use refind_core::{BoundingBox, Direction, Distance};

    struct Harness {
        earcon: Arc<RecordingEarconSink>,
        speech: Arc<RecordingSpeech>,
        haptics: Arc<RecordingHaptics>,
        dispatcher: GuidanceDispatcher,
    }

    fn harness(voice_roll: f64, haptics_supported: bool) -> Harness {
        let earcon = Arc::new(RecordingEarconSink::new());
        let speech = Arc::new(RecordingSpeech::new());
        let haptics = Arc::new(RecordingHaptics::new(haptics_supported));
        let dispatcher = GuidanceDispatcher::new(
            Arc::clone(&earcon) as Arc<dyn EarconSink>,
            Arc::clone(&speech) as Arc<dyn SpeechSynthesizer>,
            Arc::clone(&haptics) as Arc<dyn HapticActuator>,
            Arc::new(FixedProbability(voice_roll)),
            0.2,
        );
        Harness {
            earcon,
            speech,
            haptics,
            dispatcher,
        }
    }

    fn result_at(x: f32, confidence: f32, direction: Direction, distance: Distance) -> SearchResult {
        SearchResult {
            confidence,
            bounding_box: BoundingBox {
                x,
                y: 0.3,
                width: 0.2,
                height: 0.4,
            },
            distance,
            direction,
        }
    }

    #[test]
    fn left_close_detection_pans_negative_at_medium_intensity() {
        let h = harness(0.99, false);
        let result = result_at(0.35, 0.9, Direction::Left, Distance::Close);
        h.dispatcher.announce(&result, Some("My Keys"), &GuidancePrefs::default());

        let cues = h.earcon.cues();
        assert_eq!(cues.len(), 1);
        assert!(cues[0].0 < 0.0, "left pans negative");
        assert!((cues[0].1 - 0.7).abs() < f32::EPSILON, "close maps to 0.7");
    }

    #[test]
    fn audio_disabled_suppresses_earcon_and_speech() {
        let h = harness(0.0, true);
        let result = result_at(0.5, 0.95, Direction::Center, Distance::VeryClose);
        let prefs = GuidancePrefs {
            audio_enabled: false,
            haptics_enabled: true,
        };
        h.dispatcher.announce(&result, Some("Wallet"), &prefs);

        assert!(h.earcon.cues().is_empty());
        assert!(h.speech.spoken().is_empty());
        // haptics still fire
        assert_eq!(h.haptics.patterns().len(), 1);
    }

    #[test]
    fn voice_guidance_fires_under_probability() {
        let h = harness(0.0, false); // roll 0.0 < 0.2 → speak
        let result = result_at(0.35, 0.7, Direction::Left, Distance::Close);
        h.dispatcher.announce(&result, None, &GuidancePrefs::default());

        assert_eq!(h.speech.spoken(), vec!["Turn left. Close."]);
    }

    #[test]
    fn voice_guidance_skipped_over_probability() {
        let h = harness(0.5, false); // roll 0.5 >= 0.2 → silent
        let result = result_at(0.35, 0.7, Direction::Left, Distance::Close);
        h.dispatcher.announce(&result, None, &GuidancePrefs::default());

        assert!(h.speech.spoken().is_empty());
    }

    #[test]
    fn high_confidence_announces_found() {
        let h = harness(0.99, false);
        let result = result_at(0.5, 0.9, Direction::Center, Distance::VeryClose);
        h.dispatcher.announce(&result, Some("My Keys"), &GuidancePrefs::default());

        assert_eq!(h.speech.spoken(), vec!["Found My Keys"]);
    }

    #[test]
    fn threshold_confidence_does_not_announce_found() {
        let h = harness(0.99, false);
        let result = result_at(0.5, 0.85, Direction::Center, Distance::VeryClose);
        h.dispatcher.announce(&result, Some("My Keys"), &GuidancePrefs::default());

        assert!(h.speech.spoken().is_empty());
    }

    #[test]
    fn haptics_respect_device_capability() {
        let h = harness(0.99, false); // device cannot vibrate
        let result = result_at(0.5, 0.7, Direction::Center, Distance::Far);
        h.dispatcher.announce(&result, None, &GuidancePrefs::default());

        assert!(h.haptics.patterns().is_empty());
    }

    #[test]
    fn haptic_pattern_selected_by_distance() {
        let h = harness(0.99, true);
        let result = result_at(0.5, 0.7, Direction::Center, Distance::VeryClose);
        h.dispatcher.announce(&result, None, &GuidancePrefs::default());

        assert_eq!(h.haptics.patterns(), vec![vec![100, 50, 100, 50, 100]]);
    }

    #[test]
    fn repeated_announce_never_grows_pending_speech() {
        let h = harness(0.0, false);
        let result = result_at(0.35, 0.9, Direction::Left, Distance::Close);
        for _ in 0..50 {
            h.dispatcher.announce(&result, Some("Keys"), &GuidancePrefs::default());
        }
        // cancel-and-replace: exactly one utterance pending regardless of
        // how many ticks fired
        assert!(h.speech.pending().is_some());
        assert_eq!(h.speech.spoken().len(), 100); // phrase + found, per tick
        assert_eq!(h.speech.cancellations(), 99);
    }

    #[test]
    fn start_and_stop_announcements() {
        let h = harness(0.99, false);
        let prefs = GuidancePrefs::default();
        h.dispatcher.announce_search_started("My Keys", &prefs);
        h.dispatcher.announce_search_stopped(&prefs);

        assert_eq!(h.speech.spoken(), vec!["Searching for My Keys", "Search stopped"]);
    }

    #[test]
    fn stop_with_audio_disabled_cancels_pending() {
        let h = harness(0.0, false);
        let prefs = GuidancePrefs::default();
        h.dispatcher.announce_search_started("Keys", &prefs);

        let muted = GuidancePrefs {
            audio_enabled: false,
            haptics_enabled: false,
        };
        h.dispatcher.announce_search_stopped(&muted);
        assert_eq!(h.speech.pending(), None);
    }
}
