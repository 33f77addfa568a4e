use serde::{Deserialize, Serialize};

use crate::detection::domain::eye_aspect_ratio::EyeLandmarks;
use crate::detection::domain::face_zone::ZoneConfig;
use crate::difficulty::detection_config::{
    check_non_negative, check_positive, DetectionConfig, DifficultyConfig,
};
use crate::difficulty::lighting_policy::LightingConfig;
use crate::shared::constants::{EAR_HISTORY_MS, FACE_MISSING_GRACE_MS};
use crate::shared::error::ConfigError;

/// Everything the attention monitor can be tuned with. Missing fields in a
/// settings file fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub detection: DetectionConfig,
    pub difficulty: DifficultyConfig,
    pub zone: ZoneConfig,
    pub lighting: LightingConfig,
    pub eyes: EyeLandmarks,
    /// How long EAR samples are retained.
    pub ear_history_ms: f64,
    /// How long the face may be missing before the round ends.
    pub face_missing_grace_ms: f64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            difficulty: DifficultyConfig::default(),
            zone: ZoneConfig::default(),
            lighting: LightingConfig::default(),
            eyes: EyeLandmarks::default(),
            ear_history_ms: EAR_HISTORY_MS,
            face_missing_grace_ms: FACE_MISSING_GRACE_MS,
        }
    }
}

impl MonitorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detection.validate()?;
        self.difficulty.validate()?;
        self.zone.validate()?;
        self.lighting.validate()?;
        check_positive("ear_history_ms", self.ear_history_ms)?;
        check_non_negative("face_missing_grace_ms", self.face_missing_grace_ms)?;
        if self.ear_history_ms < self.detection.slow_window_ms {
            return Err(ConfigError::OutOfRange {
                field: "ear_history_ms",
                expected: "at least detection.slow_window_ms",
                value: self.ear_history_ms,
            });
        }
        if self.difficulty.max_ear_threshold < self.detection.ear_threshold {
            return Err(ConfigError::OutOfRange {
                field: "difficulty.max_ear_threshold",
                expected: "at least detection.ear_threshold",
                value: self.difficulty.max_ear_threshold,
            });
        }
        if let Some(cap) = self.lighting.drop_margin_cap() {
            if cap < self.detection.drop_margin {
                return Err(ConfigError::OutOfRange {
                    field: "lighting.drop_margin_cap",
                    expected: "at least detection.drop_margin",
                    value: cap,
                });
            }
        }
        Ok(())
    }
}
