// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The color theme the presentation layer renders with. Only the name is
/// owned here; what the colors look like is the renderer's business.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppTheme {
    #[default]
    Dark,
    Light,
}

/// Display preferences. An explicitly-constructed object handed to the
/// shell, not process-global state.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub minimal_mode: bool,
    pub auto_minimal_on_pin: bool,
    pub theme: AppTheme,
}

/// Owns the settings value and writes it back to disk on every change.
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Loads settings from `path`. A missing or unreadable file falls back
    /// to defaults; a corrupt file is reported and also falls back.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(
                        "Could not parse settings file {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        };
        SettingsStore { path, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn toggle_minimal_mode(&mut self) -> bool {
        self.settings.minimal_mode = !self.settings.minimal_mode;
        self.save();
        self.settings.minimal_mode
    }

    pub fn set_auto_minimal_on_pin(&mut self, enabled: bool) {
        self.settings.auto_minimal_on_pin = enabled;
        self.save();
    }

    pub fn set_theme(&mut self, theme: AppTheme) {
        self.settings.theme = theme;
        self.save();
    }

    fn save(&self) {
        let data = match serde_json::to_string_pretty(&self.settings) {
            Ok(data) => data,
            Err(e) => {
                warn!("Could not serialize settings: {}", e);
                return;
            }
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Could not create settings directory {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, data) {
            warn!("Error saving settings to {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json"));

        assert_eq!(*store.settings(), Settings::default());
        assert!(!store.settings().minimal_mode);
        assert_eq!(store.settings().theme, AppTheme::Dark);
    }

    #[test]
    fn test_changes_persist_across_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::load(&path);
        assert!(store.toggle_minimal_mode());
        store.set_theme(AppTheme::Light);
        store.set_auto_minimal_on_pin(true);

        let reloaded = SettingsStore::load(&path);
        assert!(reloaded.settings().minimal_mode);
        assert!(reloaded.settings().auto_minimal_on_pin);
        assert_eq!(reloaded.settings().theme, AppTheme::Light);
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ definitely not json").unwrap();

        let store = SettingsStore::load(&path);
        assert_eq!(*store.settings(), Settings::default());
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"minimal_mode": true, "retired_flag": 3}"#).unwrap();

        let store = SettingsStore::load(&path);
        assert!(store.settings().minimal_mode);
    }
}
