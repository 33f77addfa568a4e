mod settings;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use dontblink_core::detection::infrastructure::image_brightness::sample_image_brightness;
use dontblink_core::detection::infrastructure::jsonl_landmark_reader::JsonlLandmarkReader;
use dontblink_core::monitor::attention_monitor::AttentionMonitor;
use dontblink_core::monitor::frame_pacer::FramePacer;
use dontblink_core::monitor::frame_report::Verdict;
use dontblink_core::monitor::play_round_use_case::{PlayRoundUseCase, RoundOutcome};
use dontblink_core::monitor::round_logger::LogRoundLogger;
use dontblink_core::shared::constants::{DEFAULT_FPS_CAP, MIN_FPS_CAP, RECORDING_EXTENSIONS};

/// Blink and attention monitor for the Don't Blink game.
#[derive(Parser)]
#[command(name = "dontblink", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded session (JSON lines) and report how the round ended.
    Replay {
        /// Landmark recording, one frame per line.
        recording: PathBuf,

        /// Settings JSON (default: <config dir>/DontBlink/settings.json).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Maximum frames evaluated per second.
        #[arg(long, default_value_t = DEFAULT_FPS_CAP)]
        fps: f64,

        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the normalized brightness of an image.
    Brightness {
        image: PathBuf,

        /// Settings JSON, for the low-light threshold.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the effective settings as JSON.
    Settings {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Replay {
            recording,
            config,
            fps,
            json,
        } => run_replay(&recording, config.as_deref(), fps, json),
        Command::Brightness { image, config } => run_brightness(&image, config.as_deref()),
        Command::Settings { config } => {
            let settings = settings::load(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

fn run_replay(
    recording: &Path,
    config: Option<&Path>,
    fps: f64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    validate_replay(recording, fps)?;

    let monitor = AttentionMonitor::new(settings::load(config)?)?;
    let source = JsonlLandmarkReader::open(recording)?;
    let mut use_case = PlayRoundUseCase::new(
        Box::new(source),
        monitor,
        FramePacer::new(fps),
        Box::new(LogRoundLogger::default()),
    );
    let outcome = use_case.execute()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", describe_outcome(&outcome));
    }
    Ok(())
}

fn run_brightness(image: &Path, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if !image.is_file() {
        return Err(format!("Image not found: {}", image.display()).into());
    }
    let settings = settings::load(config)?;
    let brightness = sample_image_brightness(image)?;
    let label = if settings.lighting.is_low_light(brightness) {
        "low light"
    } else {
        "ok"
    };
    println!("{brightness:.4} ({label})");
    Ok(())
}

fn validate_replay(recording: &Path, fps: f64) -> Result<(), Box<dyn std::error::Error>> {
    if !recording.is_file() {
        return Err(format!("Recording not found: {}", recording.display()).into());
    }
    if !is_recording(recording) {
        log::warn!(
            "{} does not have a recording extension ({}), reading it as JSON lines anyway",
            recording.display(),
            RECORDING_EXTENSIONS.join(", ")
        );
    }
    if !fps.is_finite() || fps <= 0.0 {
        return Err(format!("FPS must be a positive number, got {fps}").into());
    }
    if fps < MIN_FPS_CAP {
        log::warn!("FPS {fps} is below the minimum, using {MIN_FPS_CAP}");
    }
    Ok(())
}

fn is_recording(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| RECORDING_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn describe_outcome(outcome: &RoundOutcome) -> String {
    let secs = outcome.survived_secs;
    let headline = match outcome.verdict {
        Verdict::BlinkDetected => format!("Blinked after {secs:.2}s"),
        Verdict::ZoneExit => format!("Left the camera zone after {secs:.2}s (not scored)"),
        Verdict::FaceLost => format!("Face lost after {secs:.2}s (not scored)"),
        Verdict::Continue => format!("Recording ended after {secs:.2}s without a blink"),
    };
    format!(
        "{headline}\nDifficulty step {}, {} frames evaluated, {} skipped, {} unreadable",
        outcome.difficulty_step,
        outcome.frames_delivered,
        outcome.frames_skipped,
        outcome.read_errors
    )
}
