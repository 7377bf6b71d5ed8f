//! Cue tables: stereo pan, earcon intensity, vibration patterns, and the
//! spoken phrase templates.

use refind_core::{Direction, Distance};

/// Stereo pan for a direction: negative is left, positive is right.
#[must_use]
pub fn pan_for(direction: Direction) -> f32 {
    match direction {
        Direction::Left => -0.8,
        Direction::Center => 0.0,
        Direction::Right => 0.8,
    }
}

/// Earcon intensity for a distance band.
#[must_use]
pub fn intensity_for(distance: Distance) -> f32 {
    match distance {
        Distance::VeryClose => 1.0,
        Distance::Close => 0.7,
        Distance::Medium => 0.4,
        Distance::Far => 0.2,
    }
}

/// Vibration pattern for a distance band, alternating pulse/pause
/// durations in milliseconds.
#[must_use]
pub fn haptic_pattern(distance: Distance) -> &'static [u64] {
    match distance {
        Distance::VeryClose => &[100, 50, 100, 50, 100], // rapid pulses
        Distance::Close => &[150, 100, 150],             // medium pulses
        Distance::Medium => &[200, 200, 200],            // slow pulses
        Distance::Far => &[300],                         // single long pulse
    }
}

/// Spoken phrase for a direction.
#[must_use]
pub fn direction_phrase(direction: Direction) -> &'static str {
    match direction {
        Direction::Left => "Turn left",
        Direction::Center => "Straight ahead",
        Direction::Right => "Turn right",
    }
}

/// Spoken phrase for a distance band.
#[must_use]
pub fn distance_phrase(distance: Distance) -> &'static str {
    match distance {
        Distance::VeryClose => "Very close",
        Distance::Close => "Close",
        Distance::Medium => "Getting warmer",
        Distance::Far => "Keep searching",
    }
}

/// Compose the full guidance phrase for one detection.
#[must_use]
pub fn guidance_phrase(direction: Direction, distance: Distance) -> String {
    format!(
        "{}. {}.",
        direction_phrase(direction),
        distance_phrase(distance)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_is_signed_by_direction() {
        assert!(pan_for(Direction::Left) < 0.0);
        assert!(pan_for(Direction::Right) > 0.0);
        assert_eq!(pan_for(Direction::Center), 0.0);
        assert_eq!(pan_for(Direction::Left), -pan_for(Direction::Right));
    }

    #[test]
    fn intensity_decreases_with_distance() {
        assert!(intensity_for(Distance::VeryClose) > intensity_for(Distance::Close));
        assert!(intensity_for(Distance::Close) > intensity_for(Distance::Medium));
        assert!(intensity_for(Distance::Medium) > intensity_for(Distance::Far));
    }

    #[test]
    fn close_intensity_is_point_seven() {
        assert!((intensity_for(Distance::Close) - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn haptic_patterns_match_bands() {
        assert_eq!(haptic_pattern(Distance::VeryClose).len(), 5);
        assert_eq!(haptic_pattern(Distance::Close), &[150, 100, 150]);
        assert_eq!(haptic_pattern(Distance::Far), &[300]);
    }

    #[test]
    fn phrase_composition() {
        assert_eq!(
            guidance_phrase(Direction::Left, Distance::Close),
            "Turn left. Close."
        );
        assert_eq!(
            guidance_phrase(Direction::Center, Distance::Far),
            "Straight ahead. Keep searching."
        );
    }
}
