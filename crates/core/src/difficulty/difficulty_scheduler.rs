use crate::difficulty::detection_config::{DetectionConfig, DifficultyConfig};

/// Steps detection strictness up every `interval_secs` of a round.
///
/// Per step the EAR threshold rises by `ear_step` (capped at
/// `max_ear_threshold`) and the closed-frame requirement drops by
/// `frame_reduction_step` (floored at 1). The step never goes back down
/// within a round, so re-feeding an older elapsed time is a no-op.
pub struct DifficultyScheduler {
    base: DetectionConfig,
    schedule: DifficultyConfig,
    step: u32,
    current: DetectionConfig,
}

impl DifficultyScheduler {
    pub fn new(base: DetectionConfig, schedule: DifficultyConfig) -> Self {
        Self {
            base,
            schedule,
            step: 0,
            current: base,
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Detection parameters for the current step, before lighting adjustment.
    pub fn current(&self) -> &DetectionConfig {
        &self.current
    }

    pub fn base(&self) -> &DetectionConfig {
        &self.base
    }

    pub fn step_for(&self, elapsed_secs: f64) -> u32 {
        if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
            return 0;
        }
        (elapsed_secs / self.schedule.interval_secs).floor() as u32
    }

    /// Advances to the step for `elapsed_secs`. Returns `true` if the step changed.
    pub fn update(&mut self, elapsed_secs: f64) -> bool {
        let step = self.step_for(elapsed_secs);
        if step <= self.step {
            return false;
        }
        self.step = step;
        self.current = self.config_for_step(step);
        log::debug!(
            "Difficulty step {step}: ear_threshold={:.3} closed_frames={}",
            self.current.ear_threshold,
            self.current.closed_frame_threshold
        );
        true
    }

    pub fn reset(&mut self) {
        self.step = 0;
        self.current = self.base;
    }

    fn config_for_step(&self, step: u32) -> DetectionConfig {
        let step = step as f64;
        let ear_threshold = (self.base.ear_threshold + step * self.schedule.ear_step)
            .min(self.schedule.max_ear_threshold)
            .max(self.base.ear_threshold);
        let reduction = (step * self.schedule.frame_reduction_step).floor();
        let closed_frames = (self.base.closed_frame_threshold as f64 - reduction).max(1.0);
        DetectionConfig {
            ear_threshold,
            closed_frame_threshold: closed_frames as u32,
            ..self.base
        }
    }
}

impl Default for DifficultyScheduler {
    fn default() -> Self {
        Self::new(DetectionConfig::default(), DifficultyConfig::default())
    }
}
