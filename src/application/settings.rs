use std::path::{Path, PathBuf};

use crate::domain::{AppError, Settings};

const SETTINGS_FILE: &str = "settings.json";

pub fn default_path() -> PathBuf {
    PathBuf::from(SETTINGS_FILE)
}

/// Load settings, falling back to defaults when the file is missing or
/// does not parse.
pub fn load(path: &Path) -> Settings {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub fn save(path: &Path, settings: &Settings) -> Result<(), AppError> {
    let raw = serde_json::to_string_pretty(settings).map_err(|e| AppError::Io(e.to_string()))?;
    std::fs::write(path, raw).map_err(|e| AppError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Quality;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings {
            download_dir: PathBuf::from("/music"),
            quality: Quality::High,
        };
        save(&path, &settings).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.download_dir, PathBuf::from("/music"));
        assert_eq!(loaded.quality, Quality::High);
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&dir.path().join("absent.json"));
        assert_eq!(loaded.quality, Quality::Medium);
    }
}
