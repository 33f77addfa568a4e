pub mod attention_monitor;
pub mod blink_detectors;
pub mod frame_pacer;
pub mod frame_report;
pub mod monitor_settings;
pub mod play_round_use_case;
pub mod round_logger;

#[cfg(test)]
pub(crate) mod test_faces;
