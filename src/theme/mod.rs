use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{app_config_path, config_env_dirs, ConfigPathError, APP_DIR};

const THEME_CONFIG_FILE: &str = "theme.json";

pub type ThemeResult<T> = std::result::Result<T, ThemeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to read theme config: {path}")]
    ReadConfig { path: PathBuf, source: io::Error },
    #[error("failed to parse theme config")]
    ParseConfig(#[from] serde_json::Error),
}

/// Resolved colors for the configurator chrome (not the glass panel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTokens {
    pub focus_ring_color: String,
    pub focus_ring_glow: String,
    pub border_color: String,
    pub panel_background: String,
    pub canvas_background: String,
    pub text_color: String,
    pub accent_gradient: String,
    pub accent_text_color: String,
}

pub fn default_color_tokens(mode: ThemeMode) -> ColorTokens {
    match mode {
        ThemeMode::Light => ColorTokens {
            focus_ring_color: "#6D5DFC".to_string(),
            focus_ring_glow: "rgba(109, 93, 252, 0.22)".to_string(),
            border_color: "rgba(9, 9, 11, 0.10)".to_string(),
            panel_background: "rgba(255, 255, 255, 0.92)".to_string(),
            canvas_background: "#FAFAFA".to_string(),
            text_color: "#18181B".to_string(),
            accent_gradient: "linear-gradient(135deg, #7C5CFF 0%, #4F8CFF 100%)".to_string(),
            accent_text_color: "#FFFFFF".to_string(),
        },
        ThemeMode::Dark | ThemeMode::System => ColorTokens {
            focus_ring_color: "#A78BFA".to_string(),
            focus_ring_glow: "rgba(167, 139, 250, 0.26)".to_string(),
            border_color: "rgba(255, 255, 255, 0.10)".to_string(),
            panel_background: "rgba(24, 24, 27, 0.92)".to_string(),
            canvas_background: "#09090B".to_string(),
            text_color: "#F4F4F5".to_string(),
            accent_gradient: "linear-gradient(135deg, #C4B5FD 0%, #93C5FD 100%)".to_string(),
            accent_text_color: "#09090B".to_string(),
        },
    }
}

/// Per-mode color overrides; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorOverrides {
    pub focus_ring_color: Option<String>,
    pub focus_ring_glow: Option<String>,
    pub border_color: Option<String>,
    pub panel_background: Option<String>,
    pub canvas_background: Option<String>,
    pub text_color: Option<String>,
    pub accent_gradient: Option<String>,
    pub accent_text_color: Option<String>,
}

/// Color overrides with optional shared defaults + per-mode overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColors {
    #[serde(default)]
    pub common: ColorOverrides,
    #[serde(default)]
    pub dark: ColorOverrides,
    #[serde(default)]
    pub light: ColorOverrides,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub mode: ThemeMode,
    #[serde(default)]
    pub colors: Option<ThemeColors>,
}

/// Resolve color tokens for a given mode, applying user overrides on top of defaults.
pub fn resolve_color_tokens(mode: ThemeMode, overrides: Option<&ThemeColors>) -> ColorTokens {
    let mut tokens = default_color_tokens(mode);

    if let Some(colors) = overrides {
        apply_overrides(&mut tokens, &colors.common);
        let mode_overrides = match mode {
            ThemeMode::Dark | ThemeMode::System => &colors.dark,
            ThemeMode::Light => &colors.light,
        };
        apply_overrides(&mut tokens, mode_overrides);
    }

    tokens
}

fn apply_overrides(tokens: &mut ColorTokens, overrides: &ColorOverrides) {
    let fields = [
        (&mut tokens.focus_ring_color, &overrides.focus_ring_color),
        (&mut tokens.focus_ring_glow, &overrides.focus_ring_glow),
        (&mut tokens.border_color, &overrides.border_color),
        (&mut tokens.panel_background, &overrides.panel_background),
        (&mut tokens.canvas_background, &overrides.canvas_background),
        (&mut tokens.text_color, &overrides.text_color),
        (&mut tokens.accent_gradient, &overrides.accent_gradient),
        (&mut tokens.accent_text_color, &overrides.accent_text_color),
    ];
    for (token, value) in fields {
        if let Some(value) = value {
            token.clone_from(value);
        }
    }
}

pub fn load_theme_config() -> ThemeResult<ThemeConfig> {
    let (xdg_config_home, home) = config_env_dirs();
    load_theme_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_theme_config_with(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> ThemeResult<ThemeConfig> {
    let path = theme_config_path_with(xdg_config_home, home)?;
    if !path.exists() {
        return Ok(ThemeConfig::default());
    }

    let serialized = fs::read_to_string(&path).map_err(|source| ThemeError::ReadConfig {
        path: path.clone(),
        source,
    })?;
    Ok(serde_json::from_str(&serialized)?)
}

fn theme_config_path_with(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> ThemeResult<PathBuf> {
    app_config_path(APP_DIR, THEME_CONFIG_FILE, xdg_config_home, home).map_err(|error| {
        match error {
            ConfigPathError::MissingHomeDirectory => ThemeError::MissingHomeDirectory,
        }
    })
}
