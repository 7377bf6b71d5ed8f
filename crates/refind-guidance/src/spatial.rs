//! Mapping a detection's horizontal position to direction and distance.
//!
//! Pure functions of the normalized x coordinate; fully deterministic.

use serde::{Deserialize, Serialize};

use refind_core::{Direction, Distance};

/// Horizontal center of the camera frame.
const FRAME_CENTER: f32 = 0.5;

/// Combined direction/distance classification of one detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Which way the user should turn.
    pub direction: Direction,
    /// How close the detection sits to the frame center.
    pub distance: Distance,
}

/// Classify a normalized x position into a [`Placement`].
///
/// Direction: `x < 0.4` is left, `x > 0.6` is right, the band between is
/// center (boundaries inclusive toward center). Distance bands nest around
/// the frame center, evaluated tightest first.
#[must_use]
pub fn classify(x_normalized: f32) -> Placement {
    Placement {
        direction: direction_of(x_normalized),
        distance: distance_of(x_normalized),
    }
}

fn direction_of(x: f32) -> Direction {
    if x < 0.4 {
        Direction::Left
    } else if x > 0.6 {
        Direction::Right
    } else {
        Direction::Center
    }
}

fn distance_of(x: f32) -> Distance {
    let offset = (x - FRAME_CENTER).abs();
    if offset <= 0.1 {
        Distance::VeryClose
    } else if offset <= 0.2 {
        Distance::Close
    } else if offset <= 0.3 {
        Distance::Medium
    } else {
        Distance::Far
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_of_band_is_left() {
        assert_eq!(classify(0.0).direction, Direction::Left);
        assert_eq!(classify(0.39).direction, Direction::Left);
    }

    #[test]
    fn boundaries_are_inclusive_toward_center() {
        assert_eq!(classify(0.4).direction, Direction::Center);
        assert_eq!(classify(0.6).direction, Direction::Center);
    }

    #[test]
    fn right_of_band_is_right() {
        assert_eq!(classify(0.61).direction, Direction::Right);
        assert_eq!(classify(1.0).direction, Direction::Right);
    }

    #[test]
    fn distance_bands_nest_around_center() {
        assert_eq!(classify(0.5).distance, Distance::VeryClose);
        assert_eq!(classify(0.45).distance, Distance::VeryClose);
        assert_eq!(classify(0.6).distance, Distance::VeryClose);
        assert_eq!(classify(0.35).distance, Distance::Close);
        assert_eq!(classify(0.68).distance, Distance::Close);
        assert_eq!(classify(0.25).distance, Distance::Medium);
        assert_eq!(classify(0.78).distance, Distance::Medium);
        assert_eq!(classify(0.1).distance, Distance::Far);
        assert_eq!(classify(0.95).distance, Distance::Far);
    }

    #[test]
    fn scenario_left_close() {
        // detection at x = 0.35: left of the center band, 0.15 from center
        let placement = classify(0.35);
        assert_eq!(placement.direction, Direction::Left);
        assert_eq!(placement.distance, Distance::Close);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn deterministic(x in 0.0f32..=1.0) {
                prop_assert_eq!(classify(x), classify(x));
            }

            #[test]
            fn center_band_is_never_far(x in 0.4f32..=0.6) {
                let placement = classify(x);
                prop_assert_eq!(placement.direction, Direction::Center);
                prop_assert_ne!(placement.distance, Distance::Far);
            }
        }
    }
}
