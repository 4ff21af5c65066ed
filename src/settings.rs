//! User preferences
//!
//! The last accepted launch parameters and overlay toggles. Persisted to
//! LocalStorage on the web, read from a JSON file by the native runner.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{OverlayFlags, SimulationParameters};

/// Errors loading settings from a file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Simulator settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Launch parameters
    pub params: SimulationParameters,
    /// Overlay toggles
    pub overlays: OverlayFlags,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Settings whose parameters fail validation fall back to the defaults
    pub fn sanitized(self) -> Self {
        match self.params.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("Stored parameters rejected ({}), using defaults", e);
                Self {
                    params: SimulationParameters::default(),
                    ..self
                }
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "parabolic_motion_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings.sanitized();
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::debug!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_launch_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.params, SimulationParameters::default());
        assert!(settings.overlays.show_path);
        assert!(settings.overlays.show_axes);
        assert!(!settings.overlays.show_grid);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "overlays": { "show_grid": true } }"#).unwrap();
        assert!(settings.overlays.show_grid);
        assert!(settings.overlays.show_path);
        assert_eq!(settings.params, SimulationParameters::default());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_sanitized_replaces_invalid_params() {
        let settings = Settings {
            params: SimulationParameters {
                frame_rate: 0,
                ..Default::default()
            },
            overlays: OverlayFlags {
                show_grid: true,
                ..Default::default()
            },
        };
        let clean = settings.sanitized();
        assert_eq!(clean.params, SimulationParameters::default());
        assert!(clean.overlays.show_grid);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("parabolic-motion-does-not-exist.json");
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Io(_))
        ));
    }
}
