//! Low-light tolerance widening.
//!
//! Face-mesh tracking gets noisy in poor light, so while the sampled
//! brightness sits below the floor the detectors are made more conservative:
//! more consecutive frames are required and the fast-drop delta and margin
//! are loosened. Once brightness recovers the scheduled values apply again.

use serde::{Deserialize, Serialize};

use crate::difficulty::detection_config::{check_non_negative, DetectionConfig};
use crate::shared::constants::LOW_LIGHT_THRESHOLD;
use crate::shared::error::ConfigError;

/// Domain interface for deriving low-light detection parameters.
pub trait LightingPolicy: Send {
    /// `scheduled` is the difficulty-adjusted config, `base` the round-start config.
    fn widen(&self, scheduled: &DetectionConfig, base: &DetectionConfig) -> DetectionConfig;
}

/// Fixed offsets from the base config, clamped by a floor and a cap.
pub struct AdditiveLightingPolicy {
    extra_closed_frames: u32,
    drop_delta_offset: f64,
    drop_delta_floor: f64,
    drop_margin_offset: f64,
    drop_margin_cap: f64,
}

impl AdditiveLightingPolicy {
    pub fn new(
        extra_closed_frames: u32,
        drop_delta_offset: f64,
        drop_delta_floor: f64,
        drop_margin_offset: f64,
        drop_margin_cap: f64,
    ) -> Self {
        Self {
            extra_closed_frames,
            drop_delta_offset,
            drop_delta_floor,
            drop_margin_offset,
            drop_margin_cap,
        }
    }
}

impl Default for AdditiveLightingPolicy {
    fn default() -> Self {
        Self::new(1, 0.04, 0.12, 0.03, 0.14)
    }
}

impl LightingPolicy for AdditiveLightingPolicy {
    fn widen(&self, scheduled: &DetectionConfig, base: &DetectionConfig) -> DetectionConfig {
        DetectionConfig {
            closed_frame_threshold: scheduled
                .closed_frame_threshold
                .max(base.closed_frame_threshold + self.extra_closed_frames),
            drop_delta: (base.drop_delta + self.drop_delta_offset).max(self.drop_delta_floor),
            drop_margin: (base.drop_margin + self.drop_margin_offset).min(self.drop_margin_cap),
            ..*scheduled
        }
    }
}

/// Multiplies the base values instead of offsetting them.
pub struct ScaledLightingPolicy {
    closed_frame_factor: f64,
    drop_delta_factor: f64,
    drop_margin_factor: f64,
}

impl ScaledLightingPolicy {
    pub fn new(closed_frame_factor: f64, drop_delta_factor: f64, drop_margin_factor: f64) -> Self {
        Self {
            closed_frame_factor,
            drop_delta_factor,
            drop_margin_factor,
        }
    }
}

impl LightingPolicy for ScaledLightingPolicy {
    fn widen(&self, scheduled: &DetectionConfig, base: &DetectionConfig) -> DetectionConfig {
        let scaled_frames = (base.closed_frame_threshold as f64 * self.closed_frame_factor).ceil();
        DetectionConfig {
            closed_frame_threshold: scheduled.closed_frame_threshold.max(scaled_frames as u32),
            drop_delta: base.drop_delta * self.drop_delta_factor,
            drop_margin: base.drop_margin * self.drop_margin_factor,
            ..*scheduled
        }
    }
}

/// Serializable choice of lighting policy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LightingAdjustment {
    Additive {
        extra_closed_frames: u32,
        drop_delta_offset: f64,
        drop_delta_floor: f64,
        drop_margin_offset: f64,
        drop_margin_cap: f64,
    },
    Scaled {
        closed_frame_factor: f64,
        drop_delta_factor: f64,
        drop_margin_factor: f64,
    },
}

impl Default for LightingAdjustment {
    fn default() -> Self {
        LightingAdjustment::Additive {
            extra_closed_frames: 1,
            drop_delta_offset: 0.04,
            drop_delta_floor: 0.12,
            drop_margin_offset: 0.03,
            drop_margin_cap: 0.14,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Brightness (0..1) below which low-light mode is on.
    pub low_light_threshold: f64,
    pub adjustment: LightingAdjustment,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            low_light_threshold: LOW_LIGHT_THRESHOLD,
            adjustment: LightingAdjustment::default(),
        }
    }
}

impl LightingConfig {
    pub fn is_low_light(&self, brightness: f64) -> bool {
        brightness < self.low_light_threshold
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.low_light_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "lighting.low_light_threshold",
                expected: "within [0, 1]",
                value: self.low_light_threshold,
            });
        }
        match self.adjustment {
            LightingAdjustment::Additive {
                drop_delta_offset,
                drop_delta_floor,
                drop_margin_offset,
                drop_margin_cap,
                ..
            } => {
                check_non_negative("lighting.drop_delta_offset", drop_delta_offset)?;
                check_non_negative("lighting.drop_delta_floor", drop_delta_floor)?;
                check_non_negative("lighting.drop_margin_offset", drop_margin_offset)?;
                check_non_negative("lighting.drop_margin_cap", drop_margin_cap)
            }
            LightingAdjustment::Scaled {
                closed_frame_factor,
                drop_delta_factor,
                drop_margin_factor,
            } => {
                check_widening("lighting.closed_frame_factor", closed_frame_factor)?;
                check_widening("lighting.drop_delta_factor", drop_delta_factor)?;
                check_widening("lighting.drop_margin_factor", drop_margin_factor)
            }
        }
    }

    /// Upper bound on the widened fast-drop margin, when the adjustment has one.
    pub fn drop_margin_cap(&self) -> Option<f64> {
        match self.adjustment {
            LightingAdjustment::Additive { drop_margin_cap, .. } => Some(drop_margin_cap),
            LightingAdjustment::Scaled { .. } => None,
        }
    }

    pub fn build_policy(&self) -> Box<dyn LightingPolicy> {
        match self.adjustment {
            LightingAdjustment::Additive {
                extra_closed_frames,
                drop_delta_offset,
                drop_delta_floor,
                drop_margin_offset,
                drop_margin_cap,
            } => Box::new(AdditiveLightingPolicy::new(
                extra_closed_frames,
                drop_delta_offset,
                drop_delta_floor,
                drop_margin_offset,
                drop_margin_cap,
            )),
            LightingAdjustment::Scaled {
                closed_frame_factor,
                drop_delta_factor,
                drop_margin_factor,
            } => Box::new(ScaledLightingPolicy::new(
                closed_frame_factor,
                drop_delta_factor,
                drop_margin_factor,
            )),
        }
    }
}

/// Scale factors below 1 would tighten detection in low light.
fn check_widening(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 1.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected: "a finite factor >= 1",
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
    fn test_additive_default_offsets() {
        let base = DetectionConfig::default();
        let widened = AdditiveLightingPolicy::default().widen(&base, &base);
        assert_eq!(widened.closed_frame_threshold, 2);
        assert_relative_eq!(widened.drop_delta, 0.12, epsilon = 1e-12);
        assert_relative_eq!(widened.drop_margin, 0.09, epsilon = 1e-12);
        assert_relative_eq!(widened.ear_threshold, base.ear_threshold);
    }

    #[test]
    fn test_additive_keeps_scheduled_threshold() {
        let base = DetectionConfig::default();
        let scheduled = DetectionConfig {
            ear_threshold: 0.26,
            ..base
        };
        let widened = AdditiveLightingPolicy::default().widen(&scheduled, &base);
        assert_relative_eq!(widened.ear_threshold, 0.26);
    }

    #[test]
    fn test_additive_respects_larger_scheduled_frames() {
        let base = DetectionConfig {
            closed_frame_threshold: 1,
            ..DetectionConfig::default()
        };
        let scheduled = DetectionConfig {
            closed_frame_threshold: 5,
            ..base
        };
        let widened = AdditiveLightingPolicy::default().widen(&scheduled, &base);
        assert_eq!(widened.closed_frame_threshold, 5);
    }

    #[test]
    fn test_additive_margin_capped() {
        let base = DetectionConfig {
            drop_margin: 0.13,
            ..DetectionConfig::default()
        };
        let widened = AdditiveLightingPolicy::default().widen(&base, &base);
        assert_relative_eq!(widened.drop_margin, 0.14);
    }

    #[test]
    fn test_scaled_policy() {
        let base = DetectionConfig {
            closed_frame_threshold: 3,
            ..DetectionConfig::default()
        };
        let widened = ScaledLightingPolicy::new(1.5, 1.5, 2.0).widen(&base, &base);
        assert_eq!(widened.closed_frame_threshold, 5); // ceil(4.5)
        assert_relative_eq!(widened.drop_delta, 0.12, epsilon = 1e-12);
        assert_relative_eq!(widened.drop_margin, 0.12, epsilon = 1e-12);
    }

    #[rstest]
    #[case::dark(0.05, true)]
    #[case::at_floor(0.12, false)]
    #[case::bright(0.6, false)]
    fn test_is_low_light(#[case] brightness: f64, #[case] expected: bool) {
        assert_eq!(LightingConfig::default().is_low_light(brightness), expected);
    }

    #[test]
    fn test_deserialize_scaled_adjustment() {
        let config: LightingConfig = serde_json::from_str(
            r#"{"adjustment": {"kind": "scaled", "closed_frame_factor": 2.0, "drop_delta_factor": 1.5, "drop_margin_factor": 1.5}}"#,
        )
        .unwrap();
        assert_relative_eq!(config.low_light_threshold, LOW_LIGHT_THRESHOLD);
        assert!(matches!(config.adjustment, LightingAdjustment::Scaled { .. }));
        assert!(config.validate().is_ok());

        let base = DetectionConfig::default();
        let widened = config.build_policy().widen(&base, &base);
        assert_eq!(widened.closed_frame_threshold, 2);
    }

    #[test]
    fn test_validate_rejects_zero_factor() {
        let config = LightingConfig {
            adjustment: LightingAdjustment::Scaled {
                closed_frame_factor: 0.0,
                drop_delta_factor: 1.0,
                drop_margin_factor: 1.0,
            },
            ..LightingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[rstest]
    #[case::frames(0.5, 1.0, 1.0)]
    #[case::delta(1.0, 0.9, 1.0)]
    #[case::margin(1.0, 1.0, 0.5)]
    fn test_validate_rejects_narrowing_factor(
        #[case] closed_frame_factor: f64,
        #[case] drop_delta_factor: f64,
        #[case] drop_margin_factor: f64,
    ) {
        let config = LightingConfig {
            adjustment: LightingAdjustment::Scaled {
                closed_frame_factor,
                drop_delta_factor,
                drop_margin_factor,
            },
            ..LightingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_drop_margin_cap() {
        assert_eq!(LightingConfig::default().drop_margin_cap(), Some(0.14));
    }
}
