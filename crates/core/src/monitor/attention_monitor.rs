//! Per-frame blink and attention decisions for one round.
//!
//! Each delivered frame runs, in order: lighting check, face-missing grace,
//! zone check, EAR measurement, history and difficulty update, then the four
//! blink detectors. Zone exit wins over a blink on the same frame, and the
//! first face frame of a round only primes the drop baseline.

use crate::detection::domain::ear_history::{EarHistory, EyeSample};
use crate::detection::domain::expression::{eye_openness_scale, mouth_openness};
use crate::detection::domain::eye_aspect_ratio::{eye_aspect_ratio, Eye};
use crate::detection::domain::face_zone::FaceZoneValidator;
use crate::detection::domain::landmark_source::FrameSample;
use crate::difficulty::detection_config::DetectionConfig;
use crate::difficulty::difficulty_scheduler::DifficultyScheduler;
use crate::difficulty::lighting_policy::LightingPolicy;
use crate::monitor::blink_detectors::{
    fast_drop, instant_threshold, sustained_drop, ClosedFrameCounter,
};
use crate::monitor::frame_report::{BlinkSignal, BlinkTrigger, FrameReport, Verdict};
use crate::monitor::monitor_settings::MonitorSettings;
use crate::shared::error::{ConfigError, MonitorError};
use crate::shared::landmarks::LandmarkFrame;

/// Brightness assumed when the host did not sample one.
pub const ASSUMED_BRIGHTNESS: f64 = 1.0;

#[derive(Clone, Copy, Debug)]
struct RoundState {
    started_ms: f64,
    previous: Option<EyeSample>,
    left_closed: ClosedFrameCounter,
    right_closed: ClosedFrameCounter,
    face_missing_since: Option<f64>,
}

impl RoundState {
    fn new(started_ms: f64) -> Self {
        Self {
            started_ms,
            previous: None,
            left_closed: ClosedFrameCounter::default(),
            right_closed: ClosedFrameCounter::default(),
            face_missing_since: None,
        }
    }

    fn counter_mut(&mut self, eye: Eye) -> &mut ClosedFrameCounter {
        match eye {
            Eye::Left => &mut self.left_closed,
            Eye::Right => &mut self.right_closed,
        }
    }

    fn elapsed_secs(&self, timestamp_ms: f64) -> f64 {
        if !timestamp_ms.is_finite() {
            return 0.0;
        }
        ((timestamp_ms - self.started_ms) / 1000.0).max(0.0)
    }
}

/// What a frame showed, computed before any state changes.
enum Observation<'a> {
    NoFace,
    OutOfZone,
    Face {
        sample: EyeSample,
        frame: &'a LandmarkFrame,
    },
}

/// Decision engine for one player. Suspended until [`start`](Self::start);
/// any terminal verdict suspends it again.
pub struct AttentionMonitor {
    settings: MonitorSettings,
    zone: FaceZoneValidator,
    lighting: Box<dyn LightingPolicy>,
    scheduler: DifficultyScheduler,
    history: EarHistory,
    low_light: bool,
    round: Option<RoundState>,
}

impl AttentionMonitor {
    pub fn new(settings: MonitorSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::from_valid(settings))
    }

    fn from_valid(settings: MonitorSettings) -> Self {
        Self {
            zone: FaceZoneValidator::new(settings.zone),
            lighting: settings.lighting.build_policy(),
            scheduler: DifficultyScheduler::new(settings.detection, settings.difficulty),
            history: EarHistory::new(settings.ear_history_ms),
            low_light: false,
            round: None,
            settings,
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn is_active(&self) -> bool {
        self.round.is_some()
    }

    pub fn difficulty_step(&self) -> u32 {
        self.scheduler.step()
    }

    pub fn is_low_light(&self) -> bool {
        self.low_light
    }

    /// Detection parameters in force right now, after difficulty and lighting.
    pub fn effective_config(&self) -> DetectionConfig {
        let scheduled = self.scheduler.current();
        if self.low_light {
            self.lighting.widen(scheduled, self.scheduler.base())
        } else {
            *scheduled
        }
    }

    /// Begins a fresh round at `now_ms`, discarding everything from the last one.
    pub fn start(&mut self, now_ms: f64) -> Result<(), MonitorError> {
        if !now_ms.is_finite() {
            return Err(MonitorError::NonFiniteTimestamp(now_ms));
        }
        self.scheduler.reset();
        self.history.clear();
        self.low_light = false;
        self.round = Some(RoundState::new(now_ms));
        log::info!("Round started at {now_ms:.0}ms");
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.round.take().is_some() {
            log::info!("Round stopped");
        }
    }

    /// Convenience wrapper for a recorded or delivered [`FrameSample`].
    pub fn process_sample(&mut self, sample: &FrameSample) -> FrameReport {
        self.process_frame(
            sample.landmarks.as_ref(),
            sample.timestamp_ms,
            sample.brightness.unwrap_or(ASSUMED_BRIGHTNESS),
        )
    }

    /// Evaluates one frame. `landmarks` is `None` when no face was found;
    /// `brightness` is the frame's normalized mean luminance.
    pub fn process_frame(
        &mut self,
        landmarks: Option<&LandmarkFrame>,
        timestamp_ms: f64,
        brightness: f64,
    ) -> FrameReport {
        let Some(round) = self.round else {
            return FrameReport::inactive();
        };
        match self.observe(landmarks, timestamp_ms) {
            Ok(observation) => self.advance(round, observation, timestamp_ms, brightness),
            Err(err) => {
                log::warn!("Skipping frame at {timestamp_ms}ms: {err}");
                let mut report = self.report(Verdict::Continue, &round, timestamp_ms);
                report.diagnostic = Some(err.to_string());
                report
            }
        }
    }

    fn observe<'a>(
        &self,
        landmarks: Option<&'a LandmarkFrame>,
        timestamp_ms: f64,
    ) -> Result<Observation<'a>, MonitorError> {
        if !timestamp_ms.is_finite() {
            return Err(MonitorError::NonFiniteTimestamp(timestamp_ms));
        }
        let Some(frame) = landmarks else {
            return Ok(Observation::NoFace);
        };
        if let Err(err) = frame.validate(&self.settings.eyes.all()) {
            log::debug!("Treating malformed landmark frame as no face: {err}");
            return Ok(Observation::NoFace);
        }
        if !self.zone.is_in_zone(frame) {
            return Ok(Observation::OutOfZone);
        }
        let left = self.measure(frame, Eye::Left)?;
        let right = self.measure(frame, Eye::Right)?;
        Ok(Observation::Face {
            sample: EyeSample::new(timestamp_ms, left, right),
            frame,
        })
    }

    fn measure(&self, frame: &LandmarkFrame, eye: Eye) -> Result<f64, MonitorError> {
        let ear = eye_aspect_ratio(frame, self.settings.eyes.indices(eye))?;
        if ear.is_finite() {
            Ok(ear)
        } else {
            Err(MonitorError::NonFiniteEar { eye: eye.as_str() })
        }
    }

    fn advance(
        &mut self,
        mut round: RoundState,
        observation: Observation<'_>,
        timestamp_ms: f64,
        brightness: f64,
    ) -> FrameReport {
        self.update_lighting(brightness);
        let report = match observation {
            Observation::NoFace => self.face_missing(&mut round, timestamp_ms),
            Observation::OutOfZone => {
                round.face_missing_since = None;
                self.report(Verdict::ZoneExit, &round, timestamp_ms)
            }
            Observation::Face { sample, frame } => {
                round.face_missing_since = None;
                self.evaluate_eyes(&mut round, sample, frame)
            }
        };

        if report.verdict.is_terminal() {
            log::info!(
                "Round ended: {} after {:.2}s",
                report.verdict,
                report.elapsed_secs
            );
            self.round = None;
        } else {
            self.round = Some(round);
        }
        report
    }

    fn face_missing(&self, round: &mut RoundState, timestamp_ms: f64) -> FrameReport {
        let since = *round.face_missing_since.get_or_insert(timestamp_ms);
        if timestamp_ms - since < self.settings.face_missing_grace_ms {
            return self.report(Verdict::Continue, round, timestamp_ms);
        }
        round.face_missing_since = None;
        self.report(Verdict::FaceLost, round, timestamp_ms)
    }

    fn evaluate_eyes(
        &mut self,
        round: &mut RoundState,
        sample: EyeSample,
        frame: &LandmarkFrame,
    ) -> FrameReport {
        self.history.push(sample);
        self.scheduler
            .update(round.elapsed_secs(sample.timestamp_ms));
        let config = self.effective_config();

        let Some(previous) = round.previous.replace(sample) else {
            let mut report = self.face_report(Verdict::Continue, round, sample, frame);
            report.priming = true;
            return report;
        };

        let mut triggers = Vec::new();
        for eye in Eye::BOTH {
            let ear = sample.ear(eye);
            let mut fire = |signal| triggers.push(BlinkTrigger { signal, eye });
            if instant_threshold(ear, &config) {
                fire(BlinkSignal::InstantThreshold);
            }
            if fast_drop(previous.ear(eye), ear, &config) {
                fire(BlinkSignal::FastDrop);
            }
            if round.counter_mut(eye).observe(ear, &config) {
                fire(BlinkSignal::ConsecutiveFrames);
            }
            let window = self
                .history
                .stats_since(eye, sample.timestamp_ms, config.slow_window_ms);
            if sustained_drop(window.as_ref(), ear, &config) {
                fire(BlinkSignal::SustainedDrop);
            }
        }

        let verdict = if triggers.is_empty() {
            Verdict::Continue
        } else {
            log::debug!("Blink triggers at {:.0}ms: {triggers:?}", sample.timestamp_ms);
            Verdict::BlinkDetected
        };
        let mut report = self.face_report(verdict, round, sample, frame);
        report.triggers = triggers;
        report
    }

    fn update_lighting(&mut self, brightness: f64) {
        let brightness = if brightness.is_finite() {
            brightness
        } else {
            ASSUMED_BRIGHTNESS
        };
        let low_light = self.settings.lighting.is_low_light(brightness);
        if low_light == self.low_light {
            return;
        }
        if low_light {
            log::debug!("Low light (brightness {brightness:.3}), widening detection tolerances");
        } else {
            log::debug!("Lighting recovered (brightness {brightness:.3})");
        }
        self.low_light = low_light;
    }

    fn report(&self, verdict: Verdict, round: &RoundState, timestamp_ms: f64) -> FrameReport {
        let config = self.effective_config();
        FrameReport {
            verdict,
            active: true,
            ear_threshold: config.ear_threshold,
            closed_frame_threshold: config.closed_frame_threshold,
            difficulty_step: self.scheduler.step(),
            low_light: self.low_light,
            elapsed_secs: round.elapsed_secs(timestamp_ms),
            left_closed_frames: round.left_closed.count(),
            right_closed_frames: round.right_closed.count(),
            ..FrameReport::default()
        }
    }

    fn face_report(
        &self,
        verdict: Verdict,
        round: &RoundState,
        sample: EyeSample,
        frame: &LandmarkFrame,
    ) -> FrameReport {
        let mut report = self.report(verdict, round, sample.timestamp_ms);
        report.left_ear = Some(sample.left);
        report.right_ear = Some(sample.right);
        report.left_eye_scale = Some(eye_openness_scale(sample.left, report.ear_threshold));
        report.right_eye_scale = Some(eye_openness_scale(sample.right, report.ear_threshold));
        report.mouth_openness = Some(mouth_openness(frame));
        report
    }
}

impl Default for AttentionMonitor {
    fn default() -> Self {
        Self::from_valid(MonitorSettings::default())
    }
}
