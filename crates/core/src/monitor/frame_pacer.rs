use crate::shared::constants::{DEFAULT_FPS_CAP, MIN_FPS_CAP};

/// Drops frames arriving faster than a capped rate, so the monitor runs at
/// most `fps_cap` evaluations per second however fast the camera delivers.
///
/// The first frame after construction or [`reset`](Self::reset) always passes.
#[derive(Clone, Debug)]
pub struct FramePacer {
    fps_cap: f64,
    min_interval_ms: f64,
    last_delivered_ms: Option<f64>,
    delivered: usize,
    skipped: usize,
}

impl FramePacer {
    /// Caps below [`MIN_FPS_CAP`] are raised to it.
    pub fn new(fps_cap: f64) -> Self {
        let fps_cap = fps_cap.max(MIN_FPS_CAP);
        Self {
            fps_cap,
            min_interval_ms: 1000.0 / fps_cap,
            last_delivered_ms: None,
            delivered: 0,
            skipped: 0,
        }
    }

    pub fn fps_cap(&self) -> f64 {
        self.fps_cap
    }

    pub fn min_interval_ms(&self) -> f64 {
        self.min_interval_ms
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Whether the frame captured at `now_ms` should be evaluated.
    pub fn should_deliver(&mut self, now_ms: f64) -> bool {
        let due = match self.last_delivered_ms {
            None => true,
            Some(last) => now_ms - last >= self.min_interval_ms,
        };
        if due {
            self.last_delivered_ms = Some(now_ms);
            self.delivered += 1;
        } else {
            self.skipped += 1;
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_delivered_ms = None;
        self.delivered = 0;
        self.skipped = 0;
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(DEFAULT_FPS_CAP)
    }
}
