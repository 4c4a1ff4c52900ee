use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::{app_config_path, config_env_dirs, ConfigPathError, APP_DIR};
use crate::glass::{HexColor, Rgb};

const SETTINGS_FILE: &str = "glass-settings-v3.json";

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to read settings: {path}")]
    ReadSettings { path: PathBuf, source: io::Error },
    #[error("failed to write settings: {path}")]
    WriteSettings { path: PathBuf, source: io::Error },
    #[error("failed to parse settings")]
    Parse(#[from] serde_json::Error),
    #[error("persisted settings are not a JSON object")]
    NotAnObject,
}

/// The full parameter set behind the glass panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub blur: f64,
    pub saturation: f64,
    pub transparency: f64,
    pub glass_color: HexColor,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub outline: f64,
    pub is_light_text: bool,
    pub is_spotlight: bool,
    /// Stored and restored, but nothing reads it.
    pub active_bg_index: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blur: 15.0,
            saturation: 180.0,
            transparency: 0.25,
            glass_color: HexColor::from_rgb(Rgb::WHITE),
            width: 350.0,
            height: 220.0,
            radius: 20.0,
            outline: 1.0,
            is_light_text: true,
            is_spotlight: false,
            active_bg_index: -1,
        }
    }
}

/// Seam between the update cycle and wherever settings live.
pub trait SettingsPersistence {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings);
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
}

impl SettingsStore {
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn with_default_path() -> Self {
        let (xdg_config_home, home) = config_env_dirs();
        match settings_path_with(xdg_config_home.as_deref(), home.as_deref()) {
            Ok(path) => Self::with_path(path),
            Err(err) => {
                tracing::warn!(?err, "settings will not persist across sessions");
                Self { path: None }
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn try_load(&self) -> SettingsResult<Option<Settings>> {
        let path = self.require_path()?;
        if !path.exists() {
            return Ok(None);
        }

        let serialized = fs::read_to_string(path).map_err(|source| SettingsError::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;
        merge_over_defaults(&serialized).map(Some)
    }

    pub fn try_save(&self, settings: &Settings) -> SettingsResult<()> {
        let path = self.require_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::WriteSettings {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let serialized = serde_json::to_string(settings)?;
        fs::write(path, serialized).map_err(|source| SettingsError::WriteSettings {
            path: path.to_path_buf(),
            source,
        })
    }

    fn require_path(&self) -> SettingsResult<&Path> {
        self.path
            .as_deref()
            .ok_or(SettingsError::MissingHomeDirectory)
    }
}

impl SettingsPersistence for SettingsStore {
    fn load(&self) -> Settings {
        if self.path.is_none() {
            return Settings::default();
        }
        match self.try_load() {
            Ok(Some(settings)) => {
                tracing::debug!(path = ?self.path, "restored persisted settings");
                settings
            }
            Ok(None) => Settings::default(),
            Err(err) => {
                tracing::warn!(?err, path = ?self.path, "ignoring persisted settings; using defaults");
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) {
        // Already warned when the store was created without a path.
        if self.path.is_none() {
            return;
        }
        if let Err(err) = self.try_save(settings) {
            tracing::warn!(?err, path = ?self.path, "failed to persist settings");
        }
    }
}

/// Overlays every known key of `serialized` onto the defaults.
///
/// Keys the current `Settings` does not declare are dropped; keys it declares
/// but the blob lacks keep their default value. A known key whose value does
/// not deserialize keeps its default without discarding the other keys.
pub fn merge_over_defaults(serialized: &str) -> SettingsResult<Settings> {
    let Value::Object(persisted) = serde_json::from_str::<Value>(serialized)? else {
        return Err(SettingsError::NotAnObject);
    };
    let Value::Object(defaults) = serde_json::to_value(Settings::default())? else {
        return Err(SettingsError::NotAnObject);
    };

    let mut merged = defaults.clone();
    for (key, value) in persisted {
        if !defaults.contains_key(&key) {
            tracing::debug!(key = %key, "ignoring unknown persisted setting");
            continue;
        }
        let mut candidate = defaults.clone();
        candidate.insert(key.clone(), value.clone());
        match serde_json::from_value::<Settings>(Value::Object(candidate)) {
            Ok(_) => {
                merged.insert(key, value);
            }
            Err(err) => {
                tracing::warn!(key = %key, %err, "rejected persisted setting; keeping default");
            }
        }
    }

    Ok(serde_json::from_value(Value::Object(merged))?)
}

fn settings_path_with(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> SettingsResult<PathBuf> {
    app_config_path(APP_DIR, SETTINGS_FILE, xdg_config_home, home).map_err(|error| match error {
        ConfigPathError::MissingHomeDirectory => SettingsError::MissingHomeDirectory,
    })
}
