/// MediaPipe FaceMesh eye landmarks in EAR order: outer corner, upper lid x2,
/// inner corner, lower lid x2.
pub const LEFT_EYE_INDICES: [usize; 6] = [33, 160, 158, 133, 153, 144];
pub const RIGHT_EYE_INDICES: [usize; 6] = [263, 387, 385, 362, 380, 373];

pub const MOUTH_TOP_INDEX: usize = 13;
pub const MOUTH_BOTTOM_INDEX: usize = 14;
pub const FACE_LEFT_EDGE_INDEX: usize = 234;
pub const FACE_RIGHT_EDGE_INDEX: usize = 454;

pub const BASE_EAR_THRESHOLD: f64 = 0.20;
pub const MAX_EAR_THRESHOLD: f64 = 0.30;
/// A single closed frame counts as a blink at the base difficulty.
pub const BASE_CLOSED_FRAMES: u32 = 1;

pub const DIFFICULTY_INTERVAL_SECS: f64 = 10.0;
pub const DIFFICULTY_EAR_STEP: f64 = 0.02;
pub const DIFFICULTY_FRAME_REDUCTION_STEP: f64 = 1.0;

pub const DROP_DELTA: f64 = 0.08;
pub const DROP_MARGIN: f64 = 0.06;
pub const NEAR_THRESHOLD_MARGIN: f64 = 0.02;
pub const SLOW_DROP_DELTA: f64 = 0.06;
/// Average-based slow drop fires at this fraction of `SLOW_DROP_DELTA`.
pub const SLOW_DROP_AVERAGE_FACTOR: f64 = 0.7;

pub const EAR_HISTORY_MS: f64 = 700.0;
pub const SLOW_WINDOW_MS: f64 = 500.0;
pub const FACE_MISSING_GRACE_MS: f64 = 700.0;

pub const ZONE_CENTER_X: f64 = 0.5;
pub const ZONE_CENTER_Y: f64 = 0.48;
pub const ZONE_MAX_DEVIATION: f64 = 0.22;
pub const MIN_FACE_WIDTH: f64 = 0.16;

/// Normalized mean luminance below which low-light mode kicks in.
pub const LOW_LIGHT_THRESHOLD: f64 = 0.12;
pub const BRIGHTNESS_SAMPLE_WIDTH: u32 = 64;
pub const BRIGHTNESS_SAMPLE_HEIGHT: u32 = 48;

/// Frame pump rate cap (~60 Hz camera) and its floor.
pub const DEFAULT_FPS_CAP: f64 = 60.0;
pub const MIN_FPS_CAP: f64 = 5.0;

pub const RECORDING_EXTENSIONS: &[&str] = &["jsonl", "ndjson"];
