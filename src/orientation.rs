use crate::exif::OrientationResult;
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, PI};

/// Rotation that brings a photo upright before display.
///
/// Only EXIF values 3, 6 and 8 are acted on; mirrored orientations and
/// every non-orientation outcome display as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Half,
    CounterClockwise90,
}

impl Rotation {
    pub fn from_orientation(result: OrientationResult) -> Self {
        match result {
            OrientationResult::Orientation(3) => Rotation::Half,
            OrientationResult::Orientation(6) => Rotation::Clockwise90,
            OrientationResult::Orientation(8) => Rotation::CounterClockwise90,
            _ => Rotation::None,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Half => 180,
            Rotation::CounterClockwise90 => -90,
        }
    }

    /// Clockwise rotation in radians, as applied to a sprite.
    pub fn radians(self) -> f64 {
        match self {
            Rotation::None => 0.0,
            Rotation::Clockwise90 => FRAC_PI_2,
            Rotation::Half => PI,
            Rotation::CounterClockwise90 => -FRAC_PI_2,
        }
    }

    /// Whether width and height trade places once rotated.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::CounterClockwise90)
    }
}

impl OrientationResult {
    pub fn rotation(self) -> Rotation {
        Rotation::from_orientation(self)
    }

    pub fn needs_rotation(self) -> bool {
        self.rotation() != Rotation::None
    }
}

/// Human-readable name for an EXIF orientation value.
pub fn orientation_label(value: u16) -> String {
    match value {
        1 => "Normal".to_string(),
        2 => "Flipped horizontally".to_string(),
        3 => "Rotated 180".to_string(),
        4 => "Flipped vertically".to_string(),
        5 => "Transposed".to_string(),
        6 => "Rotated 90 CW".to_string(),
        7 => "Transversed".to_string(),
        8 => "Rotated 270 CW".to_string(),
        _ => format!("{}", value),
    }
}

/// One-line description of a detection outcome.
pub fn describe(result: OrientationResult) -> String {
    match result {
        OrientationResult::NotJpeg => "not a JPEG".to_string(),
        OrientationResult::InvalidExif => "invalid EXIF block".to_string(),
        OrientationResult::NoOrientationTag => "no orientation tag".to_string(),
        OrientationResult::Truncated => "truncated EXIF block".to_string(),
        OrientationResult::Orientation(v) => orientation_label(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_mapping() {
        assert_eq!(
            Rotation::from_orientation(OrientationResult::Orientation(3)),
            Rotation::Half
        );
        assert_eq!(
            Rotation::from_orientation(OrientationResult::Orientation(6)),
            Rotation::Clockwise90
        );
        assert_eq!(
            Rotation::from_orientation(OrientationResult::Orientation(8)),
            Rotation::CounterClockwise90
        );
    }

    #[test]
    fn test_other_results_do_not_rotate() {
        for result in [
            OrientationResult::NotJpeg,
            OrientationResult::InvalidExif,
            OrientationResult::NoOrientationTag,
            OrientationResult::Truncated,
            OrientationResult::Orientation(1),
            OrientationResult::Orientation(2),
            OrientationResult::Orientation(5),
            OrientationResult::Orientation(7),
            OrientationResult::Orientation(42),
        ] {
            assert_eq!(result.rotation(), Rotation::None, "{:?}", result);
            assert!(!result.needs_rotation());
        }
    }

    #[test]
    fn test_degrees_and_radians() {
        assert_eq!(Rotation::Half.degrees(), 180);
        assert_eq!(Rotation::Clockwise90.degrees(), 90);
        assert_eq!(Rotation::CounterClockwise90.degrees(), -90);
        assert_eq!(Rotation::None.radians(), 0.0);
        assert!((Rotation::Clockwise90.radians() - PI / 2.0).abs() < 1e-12);
        assert!((Rotation::CounterClockwise90.radians() + PI / 2.0).abs() < 1e-12);
        assert!(Rotation::Clockwise90.swaps_dimensions());
        assert!(!Rotation::Half.swaps_dimensions());
    }

    #[test]
    fn test_labels() {
        assert_eq!(orientation_label(1), "Normal");
        assert_eq!(orientation_label(6), "Rotated 90 CW");
        assert_eq!(orientation_label(9), "9");
        assert_eq!(describe(OrientationResult::NotJpeg), "not a JPEG");
        assert_eq!(describe(OrientationResult::Orientation(8)), "Rotated 270 CW");
    }
}
