use crate::geometry::{PanelRect, Point};
use crate::glass::{project, render_snippet, HexColor};
use crate::preview::{track_pointer, BackdropPreset, BackdropSelector, PreviewPanel};
use crate::settings::{Settings, SettingsPersistence};

/// Every value the control surface owns, read in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlValues {
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
}

impl ControlValues {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            blur: settings.blur,
            saturation: settings.saturation,
            transparency: settings.transparency,
            glass_color: settings.glass_color,
            width: settings.width,
            height: settings.height,
            radius: settings.radius,
            outline: settings.outline,
            is_light_text: settings.is_light_text,
            is_spotlight: settings.is_spotlight,
        }
    }

    /// Complete overwrite of the control-owned fields; `active_bg_index` has
    /// no control and is carried over.
    fn into_settings(self, previous: &Settings) -> Settings {
        Settings {
            blur: self.blur,
            saturation: self.saturation,
            transparency: self.transparency,
            glass_color: self.glass_color,
            width: self.width,
            height: self.height,
            radius: self.radius,
            outline: self.outline,
            is_light_text: self.is_light_text,
            is_spotlight: self.is_spotlight,
            active_bg_index: previous.active_bg_index,
        }
    }
}

/// Text shown next to each numeric control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readouts {
    pub blur: String,
    pub saturation: String,
    pub transparency: String,
    pub width: String,
    pub height: String,
    pub radius: String,
    pub outline: String,
}

impl Readouts {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            blur: format!("{}px", settings.blur),
            saturation: format!("{}%", settings.saturation),
            transparency: settings.transparency.to_string(),
            width: format!("{}px", settings.width),
            height: format!("{}px", settings.height),
            radius: format!("{}px", settings.radius),
            outline: format!("{}px", settings.outline),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutput {
    pub readouts: Readouts,
    pub snippet: String,
}

/// Owns the settings, the previewed panel and its backdrop, and runs the
/// update cycle that keeps them consistent.
#[derive(Debug)]
pub struct GlassSession {
    settings: Settings,
    panel: PreviewPanel,
    backdrop: BackdropSelector,
    snippet: String,
}

impl GlassSession {
    pub fn new(settings: Settings, presets: Vec<BackdropPreset>) -> Self {
        Self {
            settings,
            panel: PreviewPanel::default(),
            backdrop: BackdropSelector::new(presets),
            snippet: String::new(),
        }
    }

    /// Loads persisted settings, pushes them through `sync` and runs the first
    /// cycle on what comes back.
    ///
    /// `sync` writes the loaded values into the controls and reads them back,
    /// so any clamping or rounding the controls apply lands in the settings.
    pub fn restore<F>(
        persistence: &dyn SettingsPersistence,
        presets: Vec<BackdropPreset>,
        sync: F,
    ) -> (Self, CycleOutput)
    where
        F: FnOnce(&Settings) -> ControlValues,
    {
        let loaded = persistence.load();
        let settings = sync(&loaded).into_settings(&loaded);
        let mut session = Self::new(settings, presets);
        let output = session.run_cycle(persistence);
        (session, output)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn panel(&self) -> &PreviewPanel {
        &self.panel
    }

    pub fn backdrop(&self) -> &BackdropSelector {
        &self.backdrop
    }

    pub fn backdrop_mut(&mut self) -> &mut BackdropSelector {
        &mut self.backdrop
    }

    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    pub fn apply_controls(
        &mut self,
        values: ControlValues,
        persistence: &dyn SettingsPersistence,
    ) -> CycleOutput {
        self.settings = values.into_settings(&self.settings);
        self.run_cycle(persistence)
    }

    fn run_cycle(&mut self, persistence: &dyn SettingsPersistence) -> CycleOutput {
        let readouts = Readouts::from_settings(&self.settings);
        let style = project(&self.settings);
        let snippet = render_snippet(&self.settings, &style);
        self.panel.apply_style(style);
        self.snippet.clone_from(&snippet);
        persistence.save(&self.settings);
        tracing::trace!(spotlight = self.settings.is_spotlight, "update cycle complete");
        CycleOutput { readouts, snippet }
    }

    /// Where the panel sits inside a preview area of the given size.
    pub fn panel_rect(&self, area_width: f64, area_height: f64) -> PanelRect {
        PanelRect::centered_in(
            area_width,
            area_height,
            self.settings.width,
            self.settings.height,
        )
    }

    /// Returns whether the preview needs repainting.
    pub fn pointer_moved(&mut self, panel_rect: PanelRect, pointer: Point) -> bool {
        let inside = panel_rect.contains(pointer);
        let hover_changed = self.panel.is_hovered() != inside;
        self.panel.set_hovered(inside);
        if !inside {
            return hover_changed;
        }
        track_pointer(&self.settings, &mut self.panel, panel_rect, pointer) || hover_changed
    }

    pub fn pointer_left(&mut self) -> bool {
        let was_hovered = self.panel.is_hovered();
        self.panel.set_hovered(false);
        was_hovered
    }
}
