use crate::config::load_app_config;
use crate::preview::{presets_from_config, BackdropPreset};
use crate::settings::SettingsStore;
use crate::theme::{load_theme_config, resolve_color_tokens, ThemeConfig, ThemeMode};
use crate::ui::ColorTokens;
use gtk4::prelude::ObjectExt;

pub(super) struct AppBootstrap {
    pub(super) theme_config: ThemeConfig,
    pub(super) backdrop_presets: Vec<BackdropPreset>,
    pub(super) settings_store: SettingsStore,
}

pub(super) fn bootstrap_app_runtime() -> AppBootstrap {
    let theme_config = load_or_default_theme_config();
    tracing::info!(mode = ?theme_config.mode, "loaded theme config");

    let app_config = load_app_config();
    let backdrop_presets = presets_from_config(app_config.backdrop_presets.as_deref());
    tracing::info!(count = backdrop_presets.len(), "loaded backdrop presets");

    let settings_store = SettingsStore::with_default_path();
    if let Some(path) = settings_store.path() {
        tracing::info!(path = %path.display(), "using settings file");
    }

    AppBootstrap {
        theme_config,
        backdrop_presets,
        settings_store,
    }
}

pub(super) fn resolve_runtime_theme_mode(
    mode: ThemeMode,
    settings: Option<&gtk4::Settings>,
) -> ThemeMode {
    match mode {
        ThemeMode::Light => ThemeMode::Light,
        ThemeMode::Dark => ThemeMode::Dark,
        ThemeMode::System => settings
            .and_then(system_theme_mode_from_settings)
            .unwrap_or(ThemeMode::Dark),
    }
}

pub(super) fn resolve_chrome_colors(theme_config: &ThemeConfig, mode: ThemeMode) -> ColorTokens {
    resolve_color_tokens(mode, theme_config.colors.as_ref())
}

fn system_theme_mode_from_settings(settings: &gtk4::Settings) -> Option<ThemeMode> {
    if settings
        .list_properties()
        .iter()
        .any(|prop| prop.name() == "gtk-interface-color-scheme")
    {
        let color_scheme = settings.property_value("gtk-interface-color-scheme");
        if let Ok(raw_scheme) = color_scheme.get::<i32>() {
            return match raw_scheme {
                // GTK_INTERFACE_COLOR_SCHEME_FORCE_LIGHT
                3 => Some(ThemeMode::Light),
                // GTK_INTERFACE_COLOR_SCHEME_FORCE_DARK
                2 => Some(ThemeMode::Dark),
                _ => None,
            };
        }
    }

    if let Some(theme_name) = settings.gtk_theme_name() {
        if let Some(mode) = mode_from_theme_name(theme_name.as_str()) {
            return Some(mode);
        }
    }

    #[allow(deprecated)]
    {
        Some(if settings.is_gtk_application_prefer_dark_theme() {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        })
    }
}

fn mode_from_theme_name(theme_name: &str) -> Option<ThemeMode> {
    let normalized = theme_name.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    if normalized.contains("dark") {
        return Some(ThemeMode::Dark);
    }
    if normalized.contains("light") {
        return Some(ThemeMode::Light);
    }
    None
}

fn load_or_default_theme_config() -> ThemeConfig {
    load_theme_config().unwrap_or_else(|err| {
        tracing::warn!(?err, "failed to load theme config; using defaults");
        ThemeConfig::default()
    })
}
