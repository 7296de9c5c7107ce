//! Persisted console settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use umkm_grid::table::{Device, PageSize, SortDirection, TableConfig, TableMode};

/// Settings error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the console remembers between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    pub page_size: PageSize,
    pub mode: TableMode,
    pub default_order: Option<(String, SortDirection)>,
    pub device: Device,
    /// Simulated backend latency in milliseconds.
    pub latency_ms: u64,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            page_size: PageSize::Ten,
            mode: TableMode::Pagination,
            default_order: Some(("registered".to_string(), SortDirection::Desc)),
            device: Device::Desktop,
            latency_ms: 150,
        }
    }
}

impl ConsoleSettings {
    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::debug!("[settings] {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("[settings] saved to {}", path.display());
        Ok(())
    }

    pub fn table_config(&self) -> TableConfig {
        let config = TableConfig::new()
            .mode(self.mode)
            .page_size(self.page_size)
            .device(self.device);
        match &self.default_order {
            Some((field, direction)) => config.default_order(field.clone(), *direction),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ConsoleSettings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, ConsoleSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = ConsoleSettings {
            page_size: PageSize::TwentyFive,
            mode: TableMode::LoadMore,
            default_order: None,
            device: Device::Tablet,
            latency_ms: 0,
        };

        settings.save(&path).unwrap();
        assert_eq!(ConsoleSettings::load(&path).unwrap(), settings);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"page_size\": 25"));
        assert!(raw.contains("\"load_more\""));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"device": "mobile"}"#).unwrap();

        let settings = ConsoleSettings::load(&path).unwrap();
        assert_eq!(settings.device, Device::Mobile);
        assert_eq!(settings.page_size, PageSize::Ten);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"page_size": 7}"#).unwrap();

        assert!(matches!(
            ConsoleSettings::load(&path),
            Err(SettingsError::Json(_))
        ));
    }
}
