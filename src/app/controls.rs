use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{
    gdk, Box as GtkBox, Button, CheckButton, ColorButton, FlowBox, Frame, Label, Orientation,
    PolicyType, ScrolledWindow, SelectionMode, TextView, WrapMode,
};

use super::runtime_css::preset_swatch_class;
use crate::glass::{HexColor, Rgb};
use crate::preview::BackdropPreset;
use crate::session::{ControlValues, CycleOutput};
use crate::settings::Settings;
use crate::ui::{section_title, slider_row, SliderRow, StyleTokens};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SliderSpec {
    pub(super) title: &'static str,
    pub(super) min: f64,
    pub(super) max: f64,
    pub(super) step: f64,
    pub(super) digits: u32,
}

pub(super) const BLUR_SLIDER: SliderSpec = SliderSpec {
    title: "Blur",
    min: 0.0,
    max: 40.0,
    step: 1.0,
    digits: 0,
};
pub(super) const SATURATION_SLIDER: SliderSpec = SliderSpec {
    title: "Saturation",
    min: 0.0,
    max: 300.0,
    step: 1.0,
    digits: 0,
};
pub(super) const TRANSPARENCY_SLIDER: SliderSpec = SliderSpec {
    title: "Transparency",
    min: 0.0,
    max: 1.0,
    step: 0.01,
    digits: 2,
};
pub(super) const WIDTH_SLIDER: SliderSpec = SliderSpec {
    title: "Width",
    min: 100.0,
    max: 600.0,
    step: 1.0,
    digits: 0,
};
pub(super) const HEIGHT_SLIDER: SliderSpec = SliderSpec {
    title: "Height",
    min: 100.0,
    max: 500.0,
    step: 1.0,
    digits: 0,
};
pub(super) const RADIUS_SLIDER: SliderSpec = SliderSpec {
    title: "Border radius",
    min: 0.0,
    max: 100.0,
    step: 1.0,
    digits: 0,
};
pub(super) const OUTLINE_SLIDER: SliderSpec = SliderSpec {
    title: "Outline",
    min: 0.0,
    max: 10.0,
    step: 1.0,
    digits: 0,
};

impl SliderSpec {
    /// Snaps a raw slider position to the control's precision and range, the
    /// way a native range input reports it.
    pub(super) fn quantize(self, value: f64) -> f64 {
        let factor = 10_f64.powi(self.digits as i32);
        let stepped = ((value - self.min) / self.step).round() * self.step + self.min;
        ((stepped * factor).round() / factor).clamp(self.min, self.max)
    }

    fn build(self, tokens: StyleTokens) -> SliderRow {
        slider_row(
            self.title,
            self.min,
            self.max,
            self.step,
            self.digits,
            tokens.spacing_8,
        )
    }
}

/// Snaps every slider-backed value the way the widgets would hold it.
pub(super) fn quantize_values(values: ControlValues) -> ControlValues {
    ControlValues {
        blur: BLUR_SLIDER.quantize(values.blur),
        saturation: SATURATION_SLIDER.quantize(values.saturation),
        transparency: TRANSPARENCY_SLIDER.quantize(values.transparency),
        width: WIDTH_SLIDER.quantize(values.width),
        height: HEIGHT_SLIDER.quantize(values.height),
        radius: RADIUS_SLIDER.quantize(values.radius),
        outline: OUTLINE_SLIDER.quantize(values.outline),
        ..values
    }
}

pub(super) fn hex_color_to_rgba(color: HexColor) -> gdk::RGBA {
    let (r, g, b) = color.rgb().unit();
    gdk::RGBA::new(r as f32, g as f32, b as f32, 1.0)
}

pub(super) fn rgba_to_hex_color(rgba: &gdk::RGBA) -> HexColor {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    HexColor::from_rgb(Rgb::new(
        channel(rgba.red()),
        channel(rgba.green()),
        channel(rgba.blue()),
    ))
}

/// Sidebar widgets: sliders with readouts, color and toggles, backdrop
/// swatches, the snippet view and the copy button.
pub(super) struct ControlSurface {
    root: ScrolledWindow,
    blur: SliderRow,
    saturation: SliderRow,
    transparency: SliderRow,
    width: SliderRow,
    height: SliderRow,
    radius: SliderRow,
    outline: SliderRow,
    glass_color: ColorButton,
    light_text: CheckButton,
    spotlight: CheckButton,
    preset_buttons: Vec<Button>,
    upload_button: Button,
    snippet_view: TextView,
    copy_button: Button,
}

impl ControlSurface {
    pub(super) fn build(tokens: StyleTokens, presets: &[BackdropPreset]) -> Self {
        let content = GtkBox::new(Orientation::Vertical, tokens.spacing_16);
        content.add_css_class("control-sidebar");

        let blur = BLUR_SLIDER.build(tokens);
        let saturation = SATURATION_SLIDER.build(tokens);
        let transparency = TRANSPARENCY_SLIDER.build(tokens);
        let glass_card = control_card(tokens, "GLASS");
        for row in [&blur, &saturation, &transparency] {
            glass_card.append(&row.container);
        }

        let color_row = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
        let color_label = Label::new(Some("Glass color"));
        color_label.set_xalign(0.0);
        color_label.set_hexpand(true);
        color_label.add_css_class("control-title");
        let glass_color = ColorButton::new();
        glass_color.set_use_alpha(false);
        glass_color.set_title("Glass color");
        color_row.append(&color_label);
        color_row.append(&glass_color);
        glass_card.append(&color_row);

        let width = WIDTH_SLIDER.build(tokens);
        let height = HEIGHT_SLIDER.build(tokens);
        let radius = RADIUS_SLIDER.build(tokens);
        let outline = OUTLINE_SLIDER.build(tokens);
        let shape_card = control_card(tokens, "SHAPE");
        for row in [&width, &height, &radius, &outline] {
            shape_card.append(&row.container);
        }

        let light_text = CheckButton::with_label("Light text");
        let spotlight = CheckButton::with_label("Spotlight effect");
        let effects_card = control_card(tokens, "EFFECTS");
        effects_card.append(&light_text);
        effects_card.append(&spotlight);

        let swatches = FlowBox::new();
        swatches.set_selection_mode(SelectionMode::None);
        swatches.set_column_spacing(tokens.spacing_8 as u32);
        swatches.set_row_spacing(tokens.spacing_8 as u32);
        swatches.set_max_children_per_line(8);
        let preset_buttons = presets
            .iter()
            .enumerate()
            .map(|(index, _)| {
                let button = Button::new();
                button.add_css_class("preset-swatch");
                button.add_css_class(&preset_swatch_class(index));
                button.set_tooltip_text(Some(&format!("Background {}", index + 1)));
                button.set_size_request(tokens.swatch_size, tokens.swatch_size);
                swatches.insert(&button, -1);
                button
            })
            .collect::<Vec<_>>();
        let upload_button = Button::with_label("Upload image…");
        let background_card = control_card(tokens, "BACKGROUND");
        background_card.append(&swatches);
        background_card.append(&upload_button);

        let snippet_view = TextView::new();
        snippet_view.set_editable(false);
        snippet_view.set_cursor_visible(false);
        snippet_view.set_monospace(true);
        snippet_view.set_wrap_mode(WrapMode::None);
        snippet_view.set_top_margin(tokens.spacing_8);
        snippet_view.set_bottom_margin(tokens.spacing_8);
        snippet_view.set_left_margin(tokens.spacing_8);
        snippet_view.set_right_margin(tokens.spacing_8);
        snippet_view.add_css_class("snippet-view");
        let snippet_scroller = ScrolledWindow::new();
        snippet_scroller.set_min_content_height(tokens.snippet_min_height);
        snippet_scroller.set_child(Some(&snippet_view));
        let snippet_frame = Frame::new(None);
        snippet_frame.add_css_class("snippet-frame");
        snippet_frame.set_child(Some(&snippet_scroller));
        let copy_button = Button::with_label("Copy CSS");
        copy_button.add_css_class("primary-button");
        let snippet_card = control_card(tokens, "CSS");
        snippet_card.append(&snippet_frame);
        snippet_card.append(&copy_button);

        for card in [
            &glass_card,
            &shape_card,
            &effects_card,
            &background_card,
            &snippet_card,
        ] {
            content.append(card);
        }

        let root = ScrolledWindow::new();
        root.set_policy(PolicyType::Never, PolicyType::Automatic);
        root.set_size_request(tokens.sidebar_width, -1);
        root.set_child(Some(&content));

        Self {
            root,
            blur,
            saturation,
            transparency,
            width,
            height,
            radius,
            outline,
            glass_color,
            light_text,
            spotlight,
            preset_buttons,
            upload_button,
            snippet_view,
            copy_button,
        }
    }

    pub(super) fn widget(&self) -> &ScrolledWindow {
        &self.root
    }

    fn sliders(&self) -> [(&SliderRow, SliderSpec); 7] {
        [
            (&self.blur, BLUR_SLIDER),
            (&self.saturation, SATURATION_SLIDER),
            (&self.transparency, TRANSPARENCY_SLIDER),
            (&self.width, WIDTH_SLIDER),
            (&self.height, HEIGHT_SLIDER),
            (&self.radius, RADIUS_SLIDER),
            (&self.outline, OUTLINE_SLIDER),
        ]
    }

    /// Must run before any handler is connected.
    pub(super) fn write_values(&self, values: &ControlValues) {
        self.blur.scale.set_value(values.blur);
        self.saturation.scale.set_value(values.saturation);
        self.transparency.scale.set_value(values.transparency);
        self.width.scale.set_value(values.width);
        self.height.scale.set_value(values.height);
        self.radius.scale.set_value(values.radius);
        self.outline.scale.set_value(values.outline);
        self.glass_color
            .set_rgba(&hex_color_to_rgba(values.glass_color));
        self.light_text.set_active(values.is_light_text);
        self.spotlight.set_active(values.is_spotlight);
    }

    pub(super) fn read_values(&self) -> ControlValues {
        quantize_values(ControlValues {
            blur: self.blur.scale.value(),
            saturation: self.saturation.scale.value(),
            transparency: self.transparency.scale.value(),
            glass_color: rgba_to_hex_color(&self.glass_color.rgba()),
            width: self.width.scale.value(),
            height: self.height.scale.value(),
            radius: self.radius.scale.value(),
            outline: self.outline.scale.value(),
            is_light_text: self.light_text.is_active(),
            is_spotlight: self.spotlight.is_active(),
        })
    }

    /// Writes `settings` into the widgets and reads back what they hold.
    pub(super) fn sync_from_settings(&self, settings: &Settings) -> ControlValues {
        self.write_values(&ControlValues::from_settings(settings));
        self.read_values()
    }

    pub(super) fn show_output(&self, output: &CycleOutput) {
        let readouts = &output.readouts;
        self.blur.readout.set_text(&readouts.blur);
        self.saturation.readout.set_text(&readouts.saturation);
        self.transparency.readout.set_text(&readouts.transparency);
        self.width.readout.set_text(&readouts.width);
        self.height.readout.set_text(&readouts.height);
        self.radius.readout.set_text(&readouts.radius);
        self.outline.readout.set_text(&readouts.outline);
        self.snippet_view.buffer().set_text(&output.snippet);
    }

    /// Every value-changing control funnels into the same update.
    pub(super) fn connect_changed<F: Fn() + 'static>(&self, on_change: F) {
        let on_change = Rc::new(on_change);
        for (row, _) in self.sliders() {
            let on_change = on_change.clone();
            row.scale.connect_value_changed(move |_| on_change());
        }
        {
            let on_change = on_change.clone();
            self.glass_color.connect_color_set(move |_| on_change());
        }
        for toggle in [&self.light_text, &self.spotlight] {
            let on_change = on_change.clone();
            toggle.connect_toggled(move |_| on_change());
        }
    }

    pub(super) fn connect_preset_selected<F: Fn(usize) + 'static>(&self, on_select: F) {
        let on_select = Rc::new(on_select);
        for (index, button) in self.preset_buttons.iter().enumerate() {
            let on_select = on_select.clone();
            button.connect_clicked(move |_| on_select(index));
        }
    }

    pub(super) fn connect_upload<F: Fn() + 'static>(&self, on_upload: F) {
        self.upload_button.connect_clicked(move |_| on_upload());
    }

    pub(super) fn connect_copy<F: Fn(String) + 'static>(&self, on_copy: F) {
        let snippet_view = self.snippet_view.clone();
        self.copy_button.connect_clicked(move |_| {
            let buffer = snippet_view.buffer();
            let (start, end) = buffer.bounds();
            on_copy(buffer.text(&start, &end, false).to_string());
        });
    }
}

fn control_card(tokens: StyleTokens, title: &str) -> GtkBox {
    let card = GtkBox::new(Orientation::Vertical, tokens.spacing_12);
    card.add_css_class("control-card");
    card.append(&section_title(title));
    card
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparency_quantizes_to_two_decimals() {
        assert_eq!(TRANSPARENCY_SLIDER.quantize(0.250_000_000_1), 0.25);
        assert_eq!(TRANSPARENCY_SLIDER.quantize(0.3449), 0.34);
        assert_eq!(TRANSPARENCY_SLIDER.quantize(1.7), 1.0);
        assert_eq!(TRANSPARENCY_SLIDER.quantize(-0.2), 0.0);
    }

    #[test]
    fn integer_sliders_snap_to_whole_steps() {
        assert_eq!(BLUR_SLIDER.quantize(14.6), 15.0);
        assert_eq!(WIDTH_SLIDER.quantize(350.4), 350.0);
        assert_eq!(HEIGHT_SLIDER.quantize(40.0), 100.0);
        assert_eq!(OUTLINE_SLIDER.quantize(12.0), 10.0);
    }

    #[test]
    fn slider_ranges_contain_defaults() {
        let defaults = ControlValues::from_settings(&Settings::default());
        for (spec, value) in [
            (BLUR_SLIDER, defaults.blur),
            (SATURATION_SLIDER, defaults.saturation),
            (TRANSPARENCY_SLIDER, defaults.transparency),
            (WIDTH_SLIDER, defaults.width),
            (HEIGHT_SLIDER, defaults.height),
            (RADIUS_SLIDER, defaults.radius),
            (OUTLINE_SLIDER, defaults.outline),
        ] {
            assert_eq!(spec.quantize(value), value, "{} default out of range", spec.title);
        }
    }

    #[test]
    fn out_of_range_persisted_values_clamp_at_restore() {
        use crate::preview::builtin_presets;
        use crate::session::GlassSession;
        use crate::settings::SettingsPersistence;
        use std::cell::RefCell;

        struct Stored(RefCell<Settings>);
        impl SettingsPersistence for Stored {
            fn load(&self) -> Settings {
                self.0.borrow().clone()
            }
            fn save(&self, settings: &Settings) {
                *self.0.borrow_mut() = settings.clone();
            }
        }

        let stored = Stored(RefCell::new(Settings {
            blur: 100.0,
            transparency: 0.333,
            width: 50.0,
            ..Settings::default()
        }));
        let (session, output) = GlassSession::restore(&stored, builtin_presets(), |loaded| {
            quantize_values(ControlValues::from_settings(loaded))
        });

        assert_eq!(session.settings().blur, 40.0);
        assert_eq!(session.settings().transparency, 0.33);
        assert_eq!(session.settings().width, 100.0);
        assert_eq!(output.readouts.blur, "40px");
        assert_eq!(output.readouts.transparency, "0.33");
        assert!(output.snippet.contains("blur(40px) saturate(180%)"));
        assert_eq!(stored.load(), *session.settings());
    }

    #[test]
    fn color_button_values_map_to_hex() {
        let color: HexColor = "#1a2b3c".parse().unwrap();
        let rgba = hex_color_to_rgba(color);
        assert_eq!(rgba.alpha(), 1.0);
        assert_eq!(rgba_to_hex_color(&rgba), color);
        assert_eq!(
            rgba_to_hex_color(&gdk::RGBA::new(1.2, 0.0, -0.5, 1.0)).to_string(),
            "#ff0000"
        );
    }
}
