use std::collections::VecDeque;

use crate::detection::domain::eye_aspect_ratio::Eye;

/// Both eyes' EAR measured on one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeSample {
    pub timestamp_ms: f64,
    pub left: f64,
    pub right: f64,
}

impl EyeSample {
    pub fn new(timestamp_ms: f64, left: f64, right: f64) -> Self {
        Self {
            timestamp_ms,
            left,
            right,
        }
    }

    pub fn ear(&self, eye: Eye) -> f64 {
        match eye {
            Eye::Left => self.left,
            Eye::Right => self.right,
        }
    }
}

/// Max and mean EAR of one eye over a trailing window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowStats {
    pub max: f64,
    pub mean: f64,
    pub samples: usize,
}

/// Time-bounded sliding window of EAR samples, oldest first.
pub struct EarHistory {
    window_ms: f64,
    samples: VecDeque<EyeSample>,
}

impl EarHistory {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            samples: VecDeque::new(),
        }
    }

    /// Appends a sample and evicts everything older than the window,
    /// measured from the new sample's timestamp.
    pub fn push(&mut self, sample: EyeSample) {
        self.samples.push_back(sample);
        let now = sample.timestamp_ms;
        while let Some(front) = self.samples.front() {
            if now - front.timestamp_ms > self.window_ms {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Stats over samples with `timestamp >= now - span_ms`.
    /// Returns `None` when the span holds no samples.
    pub fn stats_since(&self, eye: Eye, now_ms: f64, span_ms: f64) -> Option<WindowStats> {
        let start = now_ms - span_ms;
        let (max, sum, samples) = self
            .samples
            .iter()
            .filter(|s| s.timestamp_ms >= start)
            .map(|s| s.ear(eye))
            .fold((f64::NEG_INFINITY, 0.0, 0usize), |(max, sum, n), ear| {
                (max.max(ear), sum + ear, n + 1)
            });
        if samples == 0 {
            return None;
        }
        Some(WindowStats {
            max,
            mean: sum / samples as f64,
            samples,
        })
    }
}
