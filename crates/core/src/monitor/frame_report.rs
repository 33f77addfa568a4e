use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detection::domain::eye_aspect_ratio::Eye;

/// Per-frame decision of the attention monitor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    #[default]
    Continue,
    BlinkDetected,
    ZoneExit,
    FaceLost,
}

impl Verdict {
    pub const ALL: [Verdict; 4] = [
        Verdict::Continue,
        Verdict::BlinkDetected,
        Verdict::ZoneExit,
        Verdict::FaceLost,
    ];

    /// Terminal verdicts end the round.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Verdict::Continue)
    }

    /// Only an honest blink ends a round with a score worth recording;
    /// leaving the zone or the camera is treated as cheating.
    pub fn records_score(&self) -> bool {
        matches!(self, Verdict::BlinkDetected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Continue => "continue",
            Verdict::BlinkDetected => "blink_detected",
            Verdict::ZoneExit => "zone_exit",
            Verdict::FaceLost => "face_lost",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the four blink detectors fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkSignal {
    InstantThreshold,
    FastDrop,
    ConsecutiveFrames,
    SustainedDrop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkTrigger {
    pub signal: BlinkSignal,
    pub eye: Eye,
}

/// Result of one `process_frame` call. Everything besides `verdict` is for
/// display and debugging only.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrameReport {
    pub verdict: Verdict,
    /// `false` when the frame arrived while no round was running.
    pub active: bool,
    /// First face frame of a round, used only as the drop baseline.
    pub priming: bool,
    pub left_ear: Option<f64>,
    pub right_ear: Option<f64>,
    pub ear_threshold: f64,
    pub closed_frame_threshold: u32,
    pub difficulty_step: u32,
    pub low_light: bool,
    pub elapsed_secs: f64,
    pub left_closed_frames: u32,
    pub right_closed_frames: u32,
    pub triggers: Vec<BlinkTrigger>,
    pub mouth_openness: Option<f64>,
    pub left_eye_scale: Option<f64>,
    pub right_eye_scale: Option<f64>,
    /// Non-fatal problem with this frame (the round continues).
    pub diagnostic: Option<String>,
}

impl FrameReport {
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn fired(&self, signal: BlinkSignal) -> bool {
        self.triggers.iter().any(|t| t.signal == signal)
    }
}
