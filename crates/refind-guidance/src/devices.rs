//! Output device interfaces.
//!
//! The actual audio/speech/vibration hardware belongs to the platform shell;
//! the pipeline talks to it through these narrow traits. Recording doubles
//! live here so downstream crates can assert on emitted cues.

use parking_lot::Mutex;

/// Plays short non-verbal directional cues.
pub trait EarconSink: Send + Sync {
    /// Trigger one directional cue at the given stereo pan (`-1..=1`) and
    /// intensity (`0..=1`).
    fn play_directional(&self, pan: f32, intensity: f32);
}

/// Speech synthesis with cancel-and-replace semantics.
///
/// Only one utterance is active at a time: starting new speech cancels any
/// pending speech, so calling every tick can never grow an utterance queue.
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text`, cancelling any pending utterance first.
    fn speak(&self, text: &str);

    /// Cancel all pending and active speech.
    fn cancel_all(&self);
}

/// Vibration actuator, only present on some platforms.
pub trait HapticActuator: Send + Sync {
    /// Whether this device can vibrate at all.
    fn supports_vibration(&self) -> bool;

    /// Play a pulse/pause pattern (milliseconds).
    fn vibrate(&self, pattern: &[u64]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test doubles
// ─────────────────────────────────────────────────────────────────────────────

/// Earcon sink that records every cue it is asked to play.
#[derive(Default)]
pub struct RecordingEarconSink {
    cues: Mutex<Vec<(f32, f32)>>,
}

impl RecordingEarconSink {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(pan, intensity)` pairs played so far.
    pub fn cues(&self) -> Vec<(f32, f32)> {
        self.cues.lock().clone()
    }
}

impl EarconSink for RecordingEarconSink {
    fn play_directional(&self, pan: f32, intensity: f32) {
        self.cues.lock().push((pan, intensity));
    }
}

/// Speech double tracking utterances and cancellations.
///
/// Mirrors the cancel-and-replace contract: at most one utterance is pending
/// at any time; each `speak` replaces the previous one.
#[derive(Default)]
pub struct RecordingSpeech {
    spoken: Mutex<Vec<String>>,
    pending: Mutex<Option<String>>,
    cancellations: Mutex<usize>,
}

impl RecordingSpeech {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every utterance ever requested, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }

    /// The single utterance currently pending, if any.
    pub fn pending(&self) -> Option<String> {
        self.pending.lock().clone()
    }

    /// How many times pending speech was cancelled (by replacement or
    /// explicit `cancel_all`).
    pub fn cancellations(&self) -> usize {
        *self.cancellations.lock()
    }
}

impl SpeechSynthesizer for RecordingSpeech {
    fn speak(&self, text: &str) {
        let mut pending = self.pending.lock();
        if pending.is_some() {
            *self.cancellations.lock() += 1;
        }
        *pending = Some(text.to_owned());
        self.spoken.lock().push(text.to_owned());
    }

    fn cancel_all(&self) {
        let mut pending = self.pending.lock();
        if pending.take().is_some() {
            *self.cancellations.lock() += 1;
        }
    }
}

/// Haptic double with configurable capability.
pub struct RecordingHaptics {
    supported: bool,
    patterns: Mutex<Vec<Vec<u64>>>,
}

impl RecordingHaptics {
    /// Create a recorder advertising the given vibration capability.
    #[must_use]
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            patterns: Mutex::new(Vec::new()),
        }
    }

    /// Every pattern played so far.
    pub fn patterns(&self) -> Vec<Vec<u64>> {
        self.patterns.lock().clone()
    }
}

impl HapticActuator for RecordingHaptics {
    fn supports_vibration(&self) -> bool {
        self.supported
    }

    fn vibrate(&self, pattern: &[u64]) {
        self.patterns.lock().push(pattern.to_vec());
    }
}
