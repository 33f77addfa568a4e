use serde::{Deserialize, Serialize};

use crate::shared::constants::{MIN_FACE_WIDTH, ZONE_CENTER_X, ZONE_CENTER_Y, ZONE_MAX_DEVIATION};
use crate::shared::error::ConfigError;
use crate::shared::landmarks::LandmarkFrame;

/// Region (normalized coordinates) the player's face must stay inside.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    pub center_x: f64,
    pub center_y: f64,
    pub max_deviation: f64,
    pub min_face_width: f64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            center_x: ZONE_CENTER_X,
            center_y: ZONE_CENTER_Y,
            max_deviation: ZONE_MAX_DEVIATION,
            min_face_width: MIN_FACE_WIDTH,
        }
    }
}

impl ZoneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("zone.center_x", self.center_x), ("zone.center_y", self.center_y)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    expected: "within [0, 1]",
                    value,
                });
            }
        }
        for (field, value) in [
            ("zone.max_deviation", self.max_deviation),
            ("zone.min_face_width", self.min_face_width),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::OutOfRange {
                    field,
                    expected: "a finite value >= 0",
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Center and width of the landmark bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
}

impl FaceBox {
    pub fn from_landmarks(frame: &LandmarkFrame) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = frame.bounds()?;
        Some(Self {
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
            width: max_x - min_x,
        })
    }
}

/// Checks the face is centered close enough and large enough.
pub struct FaceZoneValidator {
    config: ZoneConfig,
}

impl FaceZoneValidator {
    pub fn new(config: ZoneConfig) -> Self {
        Self { config }
    }

    pub fn is_in_zone(&self, frame: &LandmarkFrame) -> bool {
        let Some(face) = FaceBox::from_landmarks(frame) else {
            return false;
        };
        let deviation =
            (face.center_x - self.config.center_x).hypot(face.center_y - self.config.center_y);
        deviation <= self.config.max_deviation && face.width >= self.config.min_face_width
    }
}

impl Default for FaceZoneValidator {
    fn default() -> Self {
        Self::new(ZoneConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::landmarks::LandmarkPoint;
    use approx::assert_relative_eq;
    use rstest::rstest;

    /// Two-point face box spanning `width` around `(cx, cy)`.
    fn face(cx: f64, cy: f64, width: f64) -> LandmarkFrame {
        LandmarkFrame::new(vec![
            LandmarkPoint::new(cx - width / 2.0, cy - 0.1, 0.0),
            LandmarkPoint::new(cx + width / 2.0, cy + 0.1, 0.0),
        ])
    }

    #[test]
    fn test_face_box_metrics() {
        let b = FaceBox::from_landmarks(&face(0.4, 0.5, 0.3)).unwrap();
        assert_relative_eq!(b.center_x, 0.4, epsilon = 1e-12);
        assert_relative_eq!(b.center_y, 0.5, epsilon = 1e-12);
        assert_relative_eq!(b.width, 0.3, epsilon = 1e-12);
    }

    #[rstest]
    #[case::centered(0.5, 0.48, 0.3, true)]
    #[case::slightly_off(0.6, 0.55, 0.3, true)]
    #[case::far_left(0.2, 0.48, 0.3, false)]
    #[case::too_low(0.5, 0.75, 0.3, false)]
    #[case::too_small(0.5, 0.48, 0.1, false)]
    fn test_in_zone(#[case] cx: f64, #[case] cy: f64, #[case] width: f64, #[case] expected: bool) {
        let validator = FaceZoneValidator::default();
        assert_eq!(validator.is_in_zone(&face(cx, cy, width)), expected);
    }

    #[test]
    fn test_deviation_boundary_is_inclusive() {
        let validator = FaceZoneValidator::new(ZoneConfig {
            center_x: 0.5,
            center_y: 0.5,
            max_deviation: 0.25,
            min_face_width: 0.0,
        });
        assert!(validator.is_in_zone(&face(0.75, 0.5, 0.0)));
        assert!(!validator.is_in_zone(&face(0.76, 0.5, 0.0)));
    }

    #[test]
    fn test_empty_frame_is_out_of_zone() {
        assert!(!FaceZoneValidator::default().is_in_zone(&LandmarkFrame::default()));
    }

    #[rstest]
    #[case::center_out_of_range(ZoneConfig { center_x: 1.5, ..ZoneConfig::default() })]
    #[case::negative_deviation(ZoneConfig { max_deviation: -0.1, ..ZoneConfig::default() })]
    #[case::nan_width(ZoneConfig { min_face_width: f64::NAN, ..ZoneConfig::default() })]
    fn test_validate_rejects(#[case] config: ZoneConfig) {
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_validates() {
        assert!(ZoneConfig::default().validate().is_ok());
    }
}
