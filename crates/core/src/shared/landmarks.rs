//! Face-mesh landmark snapshots in normalized image space.
//!
//! Coordinates are in `[0, 1]` relative to the camera frame; `z` is the
//! model's relative depth and is carried through but not used for distances.

use serde::{Deserialize, Serialize};

use crate::shared::error::MonitorError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar (x, y) distance.
    pub fn distance(&self, other: &LandmarkPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One camera frame's worth of landmarks (468 or 478 points for FaceMesh).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<LandmarkPoint>,
}

impl LandmarkFrame {
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    /// Builds a frame from a flat `[x0, y0, z0, x1, y1, z1, ...]` buffer.
    /// Trailing values that don't form a whole point are dropped.
    pub fn from_flat_xyz(values: &[f64]) -> Self {
        let points = values
            .chunks_exact(3)
            .map(|c| LandmarkPoint::new(c[0], c[1], c[2]))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LandmarkPoint> {
        self.points.get(index)
    }

    pub fn point(&self, index: usize) -> Result<&LandmarkPoint, MonitorError> {
        self.points.get(index).ok_or(MonitorError::LandmarkOutOfRange {
            index,
            len: self.points.len(),
        })
    }

    /// Checks the frame is usable: non-empty, all `required` indices present,
    /// and every coordinate finite.
    pub fn validate(&self, required: &[usize]) -> Result<(), MonitorError> {
        if self.points.is_empty() {
            return Err(MonitorError::EmptyFrame);
        }
        for &index in required {
            self.point(index)?;
        }
        if let Some(index) = self.points.iter().position(|p| !p.is_finite()) {
            return Err(MonitorError::NonFiniteLandmark { index });
        }
        Ok(())
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`, or `None` when empty.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let init = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        Some(
            self.points
                .iter()
                .fold(init, |(min_x, min_y, max_x, max_y), p| {
                    (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
                }),
        )
    }
}

impl From<Vec<LandmarkPoint>> for LandmarkFrame {
    fn from(points: Vec<LandmarkPoint>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn frame(points: &[(f64, f64)]) -> LandmarkFrame {
        LandmarkFrame::new(
            points
                .iter()
                .map(|&(x, y)| LandmarkPoint::new(x, y, 0.0))
                .collect(),
        )
    }

    #[test]
    fn test_distance_ignores_depth() {
        let a = LandmarkPoint::new(0.0, 0.0, 0.0);
        let b = LandmarkPoint::new(0.3, 0.4, 5.0);
        assert_relative_eq!(a.distance(&b), 0.5);
    }

    #[test]
    fn test_from_flat_xyz() {
        let f = LandmarkFrame::from_flat_xyz(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.9]);
        assert_eq!(f.len(), 2);
        assert_eq!(f.points()[1], LandmarkPoint::new(0.4, 0.5, 0.6));
    }

    #[test]
    fn test_bounds() {
        let f = frame(&[(0.3, 0.2), (0.6, 0.7), (0.4, 0.1)]);
        let (min_x, min_y, max_x, max_y) = f.bounds().unwrap();
        assert_relative_eq!(min_x, 0.3);
        assert_relative_eq!(min_y, 0.1);
        assert_relative_eq!(max_x, 0.6);
        assert_relative_eq!(max_y, 0.7);
    }

    #[test]
    fn test_bounds_empty_is_none() {
        assert!(LandmarkFrame::default().bounds().is_none());
    }

    #[test]
    fn test_validate_ok() {
        let f = frame(&[(0.1, 0.1), (0.2, 0.2), (0.3, 0.3)]);
        assert!(f.validate(&[0, 2]).is_ok());
    }

    #[test]
    fn test_validate_empty() {
        assert_eq!(
            LandmarkFrame::default().validate(&[]),
            Err(MonitorError::EmptyFrame)
        );
    }

    #[test]
    fn test_validate_missing_index() {
        let f = frame(&[(0.1, 0.1), (0.2, 0.2)]);
        assert_eq!(
            f.validate(&[1, 5]),
            Err(MonitorError::LandmarkOutOfRange { index: 5, len: 2 })
        );
    }

    #[rstest]
    #[case::nan_x(f64::NAN, 0.5)]
    #[case::inf_y(0.5, f64::INFINITY)]
    fn test_validate_non_finite(#[case] x: f64, #[case] y: f64) {
        let f = frame(&[(0.1, 0.1), (x, y)]);
        assert_eq!(
            f.validate(&[]),
            Err(MonitorError::NonFiniteLandmark { index: 1 })
        );
    }

    #[test]
    fn test_deserialize_transparent_with_default_z() {
        let f: LandmarkFrame = serde_json::from_str(r#"[{"x":0.1,"y":0.2},{"x":0.3,"y":0.4,"z":-0.01}]"#).unwrap();
        assert_eq!(f.len(), 2);
        assert_relative_eq!(f.points()[0].z, 0.0);
        assert_relative_eq!(f.points()[1].z, -0.01);
    }
}
