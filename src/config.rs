use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::export::DEFAULT_EXPORT_FILE;
use crate::history::DEFAULT_STORAGE_KEY;

const APP_DIR: &str = "utm-builder";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    pub storage_key: String,
    pub export_file: PathBuf,
    pub copy_on_build: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join(APP_DIR).join("history.db"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            export_file: PathBuf::from(DEFAULT_EXPORT_FILE),
            copy_on_build: false,
        }
    }
}

impl Settings {
    /// Load from an explicit file, else the per-user settings file, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Settings file not found: {:?}", path);
            }
            return Self::from_file(path);
        }

        match default_settings_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                info!(action = "load", component = "settings", "Using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        info!(action = "load", component = "settings", file_path = ?path, "Settings loaded");
        Ok(settings)
    }
}

pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"storage_key": "campaigns", "copy_on_build": true}"#).unwrap();

        assert_eq!(settings.storage_key, "campaigns");
        assert!(settings.copy_on_build);
        assert_eq!(settings.export_file, PathBuf::from("utm-links.csv"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Settings::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(err.to_string().contains("Settings file not found"));
    }
}
