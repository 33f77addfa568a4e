use std::collections::HashMap;

use crate::monitor::frame_report::FrameReport;

/// Cross-cutting logger for round events.
///
/// Keeps the round use case free of output concerns so the CLI, the browser
/// binding and tests can each observe a round their own way.
pub trait RoundLogger: Send {
    /// Record one evaluated frame.
    fn frame(&mut self, index: usize, report: &FrameReport);

    /// Record a point-in-time metric (e.g. skipped frames, read errors).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-round summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullRoundLogger;

impl RoundLogger for NullRoundLogger {
    fn frame(&mut self, _index: usize, _report: &FrameReport) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// `log`-backed logger that tracks per-frame EAR, lighting and difficulty,
/// and reports a summary when the round ends.
///
/// Progress output is throttled to every `throttle_frames` frames.
pub struct LogRoundLogger {
    throttle_frames: usize,
    metrics: HashMap<String, Vec<f64>>,
    frames: usize,
    low_light_frames: usize,
    max_step: u32,
    last_elapsed_secs: f64,
    messages: Vec<String>,
}

impl LogRoundLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            metrics: HashMap::new(),
            frames: 0,
            low_light_frames: 0,
            max_step: 0,
            last_elapsed_secs: 0.0,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if no frame was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames == 0 {
            return None;
        }
        let mut lines = vec![format!(
            "Round summary ({} frames, {:.2}s survived):",
            self.frames, self.last_elapsed_secs
        )];

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            let values = &self.metrics[name];
            if values.is_empty() {
                continue;
            }
            let avg = values.iter().sum::<f64>() / values.len() as f64;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            lines.push(format!("  {name}: avg {avg:.3}  min {min:.3}"));
        }

        lines.push(format!("  Difficulty step reached: {}", self.max_step));
        if self.low_light_frames > 0 {
            lines.push(format!("  Low light frames: {}", self.low_light_frames));
        }
        Some(lines.join("\n"))
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    fn push_metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }
}

impl Default for LogRoundLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl RoundLogger for LogRoundLogger {
    fn frame(&mut self, index: usize, report: &FrameReport) {
        self.frames += 1;
        self.last_elapsed_secs = report.elapsed_secs;
        self.max_step = self.max_step.max(report.difficulty_step);
        if report.low_light {
            self.low_light_frames += 1;
        }
        if let Some(ear) = report.left_ear {
            self.push_metric("left_ear", ear);
        }
        if let Some(ear) = report.right_ear {
            self.push_metric("right_ear", ear);
        }

        if index % self.throttle_frames == 0 {
            log::info!(
                "Frame {index}: {:.1}s, step {}, threshold {:.3}",
                report.elapsed_secs,
                report.difficulty_step,
                report.ear_threshold
            );
        }
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.push_metric(name, value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
