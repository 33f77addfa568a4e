use std::path::PathBuf;

use thiserror::Error;

/// Per-frame evaluation failures. Never fatal: the monitor logs them and keeps
/// the round going with its previous state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MonitorError {
    #[error("landmark index {index} out of range for frame with {len} points")]
    LandmarkOutOfRange { index: usize, len: usize },
    #[error("landmark {index} has non-finite coordinates")]
    NonFiniteLandmark { index: usize },
    #[error("frame has no landmarks")]
    EmptyFrame,
    #[error("non-finite timestamp {0}")]
    NonFiniteTimestamp(f64),
    #[error("eye aspect ratio for {eye} eye is not finite")]
    NonFiniteEar { eye: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("pixel buffer has {actual} bytes, expected {expected} for {width}x{height}x{channels}")]
    SizeMismatch {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
        channels: u8,
    },
    #[error("{width}x{height}x{channels} pixel buffer does not fit in memory")]
    TooLarge { width: u32, height: u32, channels: u8 },
    #[error("unsupported channel count {0}, expected 3 (RGB) or 4 (RGBA)")]
    Channels(u8),
}

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("failed to open recording {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
