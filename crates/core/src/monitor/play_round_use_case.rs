use serde::Serialize;

use crate::detection::domain::landmark_source::LandmarkSource;
use crate::monitor::attention_monitor::AttentionMonitor;
use crate::monitor::frame_pacer::FramePacer;
use crate::monitor::frame_report::{FrameReport, Verdict};
use crate::monitor::round_logger::RoundLogger;

/// How a round went. `verdict` stays `Continue` when the source ran out
/// before anything ended the round.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundOutcome {
    pub verdict: Verdict,
    /// Seconds from the first frame to the last evaluated one; the score.
    pub survived_secs: f64,
    pub frames_delivered: usize,
    pub frames_skipped: usize,
    pub read_errors: usize,
    pub difficulty_step: u32,
}

impl RoundOutcome {
    pub fn records_score(&self) -> bool {
        self.verdict.records_score()
    }
}

/// One round: read → pace → evaluate, until a terminal verdict or the end
/// of the source. The round starts at the first frame's timestamp.
pub struct PlayRoundUseCase {
    source: Box<dyn LandmarkSource>,
    monitor: AttentionMonitor,
    pacer: FramePacer,
    logger: Box<dyn RoundLogger>,
}

impl PlayRoundUseCase {
    pub fn new(
        source: Box<dyn LandmarkSource>,
        monitor: AttentionMonitor,
        pacer: FramePacer,
        logger: Box<dyn RoundLogger>,
    ) -> Self {
        Self {
            source,
            monitor,
            pacer,
            logger,
        }
    }

    pub fn execute(&mut self) -> Result<RoundOutcome, Box<dyn std::error::Error>> {
        let mut started = false;
        let mut read_errors = 0;
        let mut last_report: Option<FrameReport> = None;
        self.pacer.reset();

        for (index, item) in self.source.frames().enumerate() {
            let sample = match item {
                Ok(sample) => sample,
                Err(e) => {
                    read_errors += 1;
                    log::warn!("Skipping unreadable frame {index}: {e}");
                    continue;
                }
            };
            if !started {
                self.monitor.start(sample.timestamp_ms)?;
                self.logger.info("Round started");
                started = true;
            }
            if !self.pacer.should_deliver(sample.timestamp_ms) {
                continue;
            }

            let report = self.monitor.process_sample(&sample);
            self.logger.frame(self.pacer.delivered() - 1, &report);
            let terminal = report.verdict.is_terminal();
            last_report = Some(report);
            if terminal {
                break;
            }
        }

        if !started {
            return Err("Landmark source contains no frames".into());
        }
        self.monitor.stop();

        let (verdict, survived_secs, difficulty_step) = match &last_report {
            Some(r) => (r.verdict, r.elapsed_secs, r.difficulty_step),
            None => (Verdict::Continue, 0.0, 0),
        };
        let outcome = RoundOutcome {
            verdict,
            survived_secs,
            frames_delivered: self.pacer.delivered(),
            frames_skipped: self.pacer.skipped(),
            read_errors,
            difficulty_step,
        };

        self.logger
            .metric("frames_skipped", outcome.frames_skipped as f64);
        self.logger.metric("read_errors", read_errors as f64);
        self.logger.info(&format!(
            "Round over: {} after {:.2}s",
            outcome.verdict, outcome.survived_secs
        ));
        self.logger.summary();
        Ok(outcome)
    }
}
