//! Scene brightness as Rec.709 mean luminance.

use ndarray::Axis;

use crate::shared::frame::Frame;

/// Returned for frames with no pixels, so a blank sample never triggers
/// low-light mode.
pub const UNKNOWN_BRIGHTNESS: f64 = 1.0;

const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

/// Mean luminance normalized to `[0, 1]`. Alpha is ignored.
pub fn mean_luminance(frame: &Frame) -> f64 {
    let pixels = frame.pixel_count();
    if pixels == 0 {
        return UNKNOWN_BRIGHTNESS;
    }
    let view = frame.as_ndarray();
    let channel_mean = |c: usize| {
        view.index_axis(Axis(2), c)
            .iter()
            .map(|&v| v as f64)
            .sum::<f64>()
            / pixels as f64
    };
    let luma = LUMA_R * channel_mean(0) + LUMA_G * channel_mean(1) + LUMA_B * channel_mean(2);
    (luma / 255.0).clamp(0.0, 1.0)
}
