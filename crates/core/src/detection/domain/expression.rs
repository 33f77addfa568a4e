//! Display-only expression metrics: mouth openness and per-eye openness scale
//! for animating an avatar that mirrors the player.

use crate::shared::constants::{
    FACE_LEFT_EDGE_INDEX, FACE_RIGHT_EDGE_INDEX, LEFT_EYE_INDICES, MOUTH_BOTTOM_INDEX,
    MOUTH_TOP_INDEX, RIGHT_EYE_INDICES,
};
use crate::shared::landmarks::LandmarkFrame;

const MIN_VISIBLE_EAR: f64 = 0.02;
const MAX_VISIBLE_EAR: f64 = 0.30;
/// Smallest scale an eye is drawn at, so it never disappears entirely.
pub const MIN_EYE_SCALE: f64 = 0.02;

/// Lip gap relative to face width, roughly 0..0.5. Zero when lip points are missing.
pub fn mouth_openness(frame: &LandmarkFrame) -> f64 {
    let (Some(top), Some(bottom)) = (frame.get(MOUTH_TOP_INDEX), frame.get(MOUTH_BOTTOM_INDEX))
    else {
        return 0.0;
    };
    let left = frame
        .get(FACE_LEFT_EDGE_INDEX)
        .or_else(|| frame.get(LEFT_EYE_INDICES[0]));
    let right = frame
        .get(FACE_RIGHT_EDGE_INDEX)
        .or_else(|| frame.get(RIGHT_EYE_INDICES[0]));
    let face_width = match (left, right) {
        (Some(l), Some(r)) if l.distance(r) > 0.0 => l.distance(r),
        _ => 1.0,
    };
    top.distance(bottom) / face_width
}

/// Maps an EAR onto a `[MIN_EYE_SCALE, 1.0]` vertical scale; eyes at or below
/// the active threshold are drawn shut.
pub fn eye_openness_scale(ear: f64, ear_threshold: f64) -> f64 {
    if ear <= ear_threshold {
        return MIN_EYE_SCALE;
    }
    let norm = (ear - MIN_VISIBLE_EAR) / (MAX_VISIBLE_EAR - MIN_VISIBLE_EAR);
    norm.clamp(MIN_EYE_SCALE, 1.0)
}
