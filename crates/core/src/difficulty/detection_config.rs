use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    BASE_CLOSED_FRAMES, BASE_EAR_THRESHOLD, DIFFICULTY_EAR_STEP, DIFFICULTY_FRAME_REDUCTION_STEP,
    DIFFICULTY_INTERVAL_SECS, DROP_DELTA, DROP_MARGIN, MAX_EAR_THRESHOLD, NEAR_THRESHOLD_MARGIN,
    SLOW_DROP_AVERAGE_FACTOR, SLOW_DROP_DELTA, SLOW_WINDOW_MS,
};
use crate::shared::error::ConfigError;

/// Parameters the four blink detectors evaluate against on a given frame.
///
/// The defaults are the round-start values; the difficulty scheduler and the
/// lighting policy derive the per-frame values from them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// EAR at or below which an eye counts as closed.
    pub ear_threshold: f64,
    /// Consecutive near-closed frames that count as a blink.
    pub closed_frame_threshold: u32,
    /// Frame-to-frame EAR drop that counts as a fast blink.
    pub drop_delta: f64,
    /// How far above the threshold a fast or slow drop may still end.
    pub drop_margin: f64,
    /// How far above the threshold a frame still counts toward the closed-frame run.
    pub near_margin: f64,
    /// Net EAR drop across the slow window that counts as a slow blink.
    pub slow_drop_delta: f64,
    /// Fraction of `slow_drop_delta` applied to the drop from the window mean.
    pub slow_drop_average_factor: f64,
    pub slow_window_ms: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            ear_threshold: BASE_EAR_THRESHOLD,
            closed_frame_threshold: BASE_CLOSED_FRAMES,
            drop_delta: DROP_DELTA,
            drop_margin: DROP_MARGIN,
            near_margin: NEAR_THRESHOLD_MARGIN,
            slow_drop_delta: SLOW_DROP_DELTA,
            slow_drop_average_factor: SLOW_DROP_AVERAGE_FACTOR,
            slow_window_ms: SLOW_WINDOW_MS,
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ear_threshold > 0.0 && self.ear_threshold <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "detection.ear_threshold",
                expected: "within (0, 1]",
                value: self.ear_threshold,
            });
        }
        if self.closed_frame_threshold == 0 {
            return Err(ConfigError::OutOfRange {
                field: "detection.closed_frame_threshold",
                expected: "at least 1",
                value: 0.0,
            });
        }
        for (field, value) in [
            ("detection.drop_delta", self.drop_delta),
            ("detection.drop_margin", self.drop_margin),
            ("detection.near_margin", self.near_margin),
            ("detection.slow_drop_delta", self.slow_drop_delta),
            ("detection.slow_drop_average_factor", self.slow_drop_average_factor),
        ] {
            check_non_negative(field, value)?;
        }
        check_positive("detection.slow_window_ms", self.slow_window_ms)
    }
}

/// How strictness ramps up over a round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub interval_secs: f64,
    pub ear_step: f64,
    pub frame_reduction_step: f64,
    pub max_ear_threshold: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            interval_secs: DIFFICULTY_INTERVAL_SECS,
            ear_step: DIFFICULTY_EAR_STEP,
            frame_reduction_step: DIFFICULTY_FRAME_REDUCTION_STEP,
            max_ear_threshold: MAX_EAR_THRESHOLD,
        }
    }
}

impl DifficultyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("difficulty.interval_secs", self.interval_secs)?;
        check_non_negative("difficulty.ear_step", self.ear_step)?;
        check_non_negative("difficulty.frame_reduction_step", self.frame_reduction_step)?;
        if !(self.max_ear_threshold > 0.0 && self.max_ear_threshold <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "difficulty.max_ear_threshold",
                expected: "within (0, 1]",
                value: self.max_ear_threshold,
            });
        }
        Ok(())
    }
}

pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected: "a finite value >= 0",
            value,
        })
    }
}

pub(crate) fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected: "a finite value > 0",
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults_match_round_start_values() {
        let config = DetectionConfig::default();
        assert_relative_eq!(config.ear_threshold, 0.20);
        assert_eq!(config.closed_frame_threshold, 1);
        assert_relative_eq!(config.drop_delta, 0.08);
        assert_relative_eq!(config.drop_margin, 0.06);
        assert_relative_eq!(config.near_margin, 0.02);
        assert_relative_eq!(config.slow_window_ms, 500.0);
        assert!(config.validate().is_ok());
        assert!(DifficultyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: DetectionConfig =
            serde_json::from_str(r#"{"ear_threshold": 0.18, "closed_frame_threshold": 3}"#).unwrap();
        assert_relative_eq!(config.ear_threshold, 0.18);
        assert_eq!(config.closed_frame_threshold, 3);
        assert_relative_eq!(config.drop_delta, DROP_DELTA);
    }

    #[rstest]
    #[case::zero_threshold(DetectionConfig { ear_threshold: 0.0, ..DetectionConfig::default() }, "detection.ear_threshold")]
    #[case::zero_frames(DetectionConfig { closed_frame_threshold: 0, ..DetectionConfig::default() }, "detection.closed_frame_threshold")]
    #[case::negative_margin(DetectionConfig { drop_margin: -0.01, ..DetectionConfig::default() }, "detection.drop_margin")]
    #[case::zero_window(DetectionConfig { slow_window_ms: 0.0, ..DetectionConfig::default() }, "detection.slow_window_ms")]
    fn test_detection_validate_rejects(#[case] config: DetectionConfig, #[case] field: &str) {
        match config.validate() {
            Err(ConfigError::OutOfRange { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected OutOfRange for {field}, got {other:?}"),
        }
    }

    #[rstest]
    #[case::zero_interval(DifficultyConfig { interval_secs: 0.0, ..DifficultyConfig::default() })]
    #[case::max_above_one(DifficultyConfig { max_ear_threshold: 1.2, ..DifficultyConfig::default() })]
    #[case::nan_step(DifficultyConfig { ear_step: f64::NAN, ..DifficultyConfig::default() })]
    fn test_difficulty_validate_rejects(#[case] config: DifficultyConfig) {
        assert!(config.validate().is_err());
    }
}
