use serde::{Deserialize, Serialize};

use crate::shared::landmarks::LandmarkFrame;

/// One delivered camera frame as the engine sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    pub timestamp_ms: f64,
    /// Normalized mean luminance; `None` when the host didn't sample it.
    #[serde(default)]
    pub brightness: Option<f64>,
    /// `None` when the face-mesh model found no face.
    #[serde(default)]
    pub landmarks: Option<LandmarkFrame>,
}

impl FrameSample {
    pub fn new(timestamp_ms: f64, landmarks: Option<LandmarkFrame>, brightness: Option<f64>) -> Self {
        Self {
            timestamp_ms,
            brightness,
            landmarks,
        }
    }
}

/// Domain interface for anything that delivers landmark frames in capture
/// order: a live face-mesh pipeline, a recording, a test script.
pub trait LandmarkSource: Send {
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<FrameSample, Box<dyn std::error::Error>>> + '_>;
}
