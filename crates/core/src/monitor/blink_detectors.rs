//! The four per-eye blink detectors. Any one firing on either eye ends the
//! round; they are OR'd so that fast, partial, and slow blinks are all caught.

use crate::detection::domain::ear_history::WindowStats;
use crate::difficulty::detection_config::DetectionConfig;

/// EAR at or below the active threshold.
pub fn instant_threshold(ear: f64, config: &DetectionConfig) -> bool {
    ear <= config.ear_threshold
}

/// Large frame-to-frame drop that ends near the threshold.
pub fn fast_drop(previous_ear: f64, ear: f64, config: &DetectionConfig) -> bool {
    previous_ear - ear > config.drop_delta && ear <= config.ear_threshold + config.drop_margin
}

/// Whether a frame counts toward the consecutive near-closed run.
pub fn near_closed(ear: f64, config: &DetectionConfig) -> bool {
    ear <= config.ear_threshold + config.near_margin
}

/// Steady decline across the slow window, relative to either the window's
/// peak or its mean. Needs at least two samples in the window.
pub fn sustained_drop(window: Option<&WindowStats>, ear: f64, config: &DetectionConfig) -> bool {
    let Some(window) = window else {
        return false;
    };
    if window.samples < 2 || ear > config.ear_threshold + config.drop_margin {
        return false;
    }
    window.max - ear > config.slow_drop_delta
        || window.mean - ear > config.slow_drop_delta * config.slow_drop_average_factor
}

/// Counts consecutive near-closed frames for one eye.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClosedFrameCounter {
    count: u32,
}

impl ClosedFrameCounter {
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Feeds one frame. Returns `true` once the run reaches the required length.
    pub fn observe(&mut self, ear: f64, config: &DetectionConfig) -> bool {
        if near_closed(ear, config) {
            self.count = self.count.saturating_add(1);
        } else {
            self.count = 0;
        }
        self.count >= config.closed_frame_threshold
    }
}
