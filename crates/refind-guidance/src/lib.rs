//! # refind-guidance
//!
//! Spatial interpretation and guidance dispatch.
//!
//! - [`classify`] — pure mapping from a normalized x position to
//!   direction/distance
//! - Cue tables — stereo pan, earcon intensity, vibration patterns, phrase
//!   templates
//! - [`GuidanceDispatcher`] — drives the earcon sink, speech synthesizer,
//!   and haptic actuator behind their device traits
//!
//! Speech is cancel-and-replace: announcing every tick can never grow an
//! utterance queue.

#![deny(unsafe_code)]

pub mod cues;
pub mod devices;
pub mod dispatcher;
pub mod spatial;

pub use cues::{
    direction_phrase, distance_phrase, guidance_phrase, haptic_pattern, intensity_for, pan_for,
};
pub use devices::{
    EarconSink, HapticActuator, RecordingEarconSink, RecordingHaptics, RecordingSpeech,
    SpeechSynthesizer,
};
pub use dispatcher::{
    FixedProbability, GuidanceDispatcher, GuidancePrefs, ProbabilitySource, ThreadRngProbability,
};
pub use spatial::{Placement, classify};
