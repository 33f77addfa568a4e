//! WebAssembly bindings for the attention monitor.
//!
//! The page runs the face-mesh model, flattens the landmarks of each frame
//! into `[x0, y0, z0, x1, ...]` and hands them to `processFrame` together
//! with the frame's timestamp and sampled brightness.

use wasm_bindgen::prelude::*;

use dontblink_core::detection::domain::brightness::mean_luminance;
use dontblink_core::monitor::attention_monitor::AttentionMonitor;
use dontblink_core::monitor::monitor_settings::MonitorSettings;
use dontblink_core::shared::error::FrameError;
use dontblink_core::shared::frame::Frame;
use dontblink_core::shared::landmarks::LandmarkFrame;

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// `None`, or a flattened xyz buffer with no complete point, means no face.
fn landmarks_from_flat(xyz: Option<Vec<f64>>) -> Option<LandmarkFrame> {
    xyz.map(|values| LandmarkFrame::from_flat_xyz(&values))
        .filter(|frame| !frame.is_empty())
}

fn rgba_brightness(rgba: &[u8], width: u32, height: u32) -> Result<f64, FrameError> {
    let frame = Frame::from_rgba(rgba.to_vec(), width, height)?;
    Ok(mean_luminance(&frame))
}

#[wasm_bindgen(js_name = "AttentionMonitor")]
pub struct WasmAttentionMonitor {
    inner: AttentionMonitor,
}

#[wasm_bindgen(js_class = "AttentionMonitor")]
impl WasmAttentionMonitor {
    /// `settings` is an optional plain object shaped like `MonitorSettings`;
    /// missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<WasmAttentionMonitor, JsValue> {
        let settings: MonitorSettings = if settings.is_undefined() || settings.is_null() {
            MonitorSettings::default()
        } else {
            serde_wasm_bindgen::from_value(settings).map_err(to_js_error)?
        };
        let inner = AttentionMonitor::new(settings).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    pub fn start(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.inner.start(now_ms).map_err(to_js_error)
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }

    #[wasm_bindgen(js_name = "isActive")]
    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    #[wasm_bindgen(js_name = "difficultyStep")]
    pub fn difficulty_step(&self) -> u32 {
        self.inner.difficulty_step()
    }

    /// Returns the frame report as a plain object (`verdict`, `triggers`,
    /// per-eye EAR and display values).
    #[wasm_bindgen(js_name = "processFrame")]
    pub fn process_frame(
        &mut self,
        landmarks: Option<Vec<f64>>,
        timestamp_ms: f64,
        brightness: f64,
    ) -> JsValue {
        let frame = landmarks_from_flat(landmarks);
        let report = self
            .inner
            .process_frame(frame.as_ref(), timestamp_ms, brightness);
        serde_wasm_bindgen::to_value(&report).unwrap_or(JsValue::NULL)
    }
}

/// Normalized mean luminance of canvas `ImageData` bytes.
#[wasm_bindgen(js_name = "sampleBrightness")]
pub fn sample_brightness(rgba: &[u8], width: u32, height: u32) -> Result<f64, JsValue> {
    rgba_brightness(rgba, width, height).map_err(|e| {
        log::warn!("Brightness sample rejected: {e}");
        to_js_error(e)
    })
}
