use std::fs;
use std::path::{Path, PathBuf};

use dontblink_core::monitor::monitor_settings::MonitorSettings;

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("DontBlink").join("settings.json"))
}

/// Loads monitor settings from `explicit`, or from the user config directory
/// when no path is given. A missing or broken default file falls back to the
/// built-in defaults; a missing or broken explicit file is an error.
pub fn load(explicit: Option<&Path>) -> Result<MonitorSettings, Box<dyn std::error::Error>> {
    let settings = match explicit {
        Some(path) => read(path)?,
        None => load_default(),
    };
    settings.validate()?;
    Ok(settings)
}

fn load_default() -> MonitorSettings {
    let Some(path) = config_path() else {
        return MonitorSettings::default();
    };
    match fs::read_to_string(&path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring invalid settings file {}: {e}", path.display());
            MonitorSettings::default()
        }),
        Err(_) => MonitorSettings::default(),
    }
}

fn read(path: &Path) -> Result<MonitorSettings, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read settings file {}: {e}", path.display()))?;
    let settings = serde_json::from_str(&json)
        .map_err(|e| format!("Invalid settings file {}: {e}", path.display()))?;
    log::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("settings.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            r#"{"detection": {"closed_frame_threshold": 3}, "lighting": {"low_light_threshold": 0.2}}"#,
        );
        let settings = load(Some(&path)).unwrap();
        assert_eq!(settings.detection.closed_frame_threshold, 3);
        assert_eq!(settings.lighting.low_light_threshold, 0.2);
        assert_eq!(settings.zone, MonitorSettings::default().zone);
    }

    #[test]
    fn test_missing_explicit_file_errors() {
        let err = load(Some(Path::new("/nonexistent/settings.json"))).unwrap_err();
        assert!(err.to_string().contains("Cannot read settings file"));
    }

    #[test]
    fn test_malformed_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "{ not json");
        let err = load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Invalid settings file"));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), r#"{"detection": {"ear_threshold": 1.5}}"#);
        let err = load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("detection.ear_threshold"));
    }
}
