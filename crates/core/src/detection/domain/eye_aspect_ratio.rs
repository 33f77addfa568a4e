//! Eye Aspect Ratio from six eye-contour landmarks.
//!
//! `EAR = (|p2-p6| + |p3-p5|) / (2 * |p1-p4|)` where p1/p4 are the eye
//! corners and p2,p3 / p6,p5 the upper / lower lid points. Open eyes sit
//! around 0.25-0.35, closed eyes drop toward 0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::constants::{LEFT_EYE_INDICES, RIGHT_EYE_INDICES};
use crate::shared::error::MonitorError;
use crate::shared::landmarks::LandmarkFrame;

/// Returned when the eye corners coincide, so bad tracking reads as "open".
pub const DEGENERATE_EAR: f64 = 1.0;

/// Landmark indices in EAR order `[p1, p2, p3, p4, p5, p6]`.
pub type EyeIndices = [usize; 6];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Eye::Left => "left",
            Eye::Right => "right",
        }
    }
}

impl fmt::Display for Eye {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which landmarks make up each eye. Defaults to the MediaPipe FaceMesh sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeLandmarks {
    pub left: EyeIndices,
    pub right: EyeIndices,
}

impl EyeLandmarks {
    pub fn indices(&self, eye: Eye) -> &EyeIndices {
        match eye {
            Eye::Left => &self.left,
            Eye::Right => &self.right,
        }
    }

    /// All twelve indices, for frame validation.
    pub fn all(&self) -> [usize; 12] {
        let mut out = [0; 12];
        out[..6].copy_from_slice(&self.left);
        out[6..].copy_from_slice(&self.right);
        out
    }
}

impl Default for EyeLandmarks {
    fn default() -> Self {
        Self {
            left: LEFT_EYE_INDICES,
            right: RIGHT_EYE_INDICES,
        }
    }
}

pub fn eye_aspect_ratio(frame: &LandmarkFrame, indices: &EyeIndices) -> Result<f64, MonitorError> {
    let [p1, p2, p3, p4, p5, p6] = indices.map(|i| frame.point(i));
    let (p1, p2, p3, p4, p5, p6) = (p1?, p2?, p3?, p4?, p5?, p6?);

    let horizontal = p1.distance(p4);
    if horizontal == 0.0 {
        return Ok(DEGENERATE_EAR);
    }
    Ok((p2.distance(p6) + p3.distance(p5)) / (2.0 * horizontal))
}
