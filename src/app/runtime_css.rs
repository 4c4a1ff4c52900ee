use std::fmt::Write as _;

use crate::preview::BackdropPreset;
use crate::ui::{ColorTokens, StyleTokens};
use gtk4::CssProvider;

pub(super) fn preset_swatch_class(index: usize) -> String {
    format!("preset-swatch-{index}")
}

pub(super) fn install_runtime_css(
    tokens: StyleTokens,
    colors: &ColorTokens,
    presets: &[BackdropPreset],
) {
    let css = runtime_css(tokens, colors, presets);
    let provider = CssProvider::new();
    provider.load_from_data(&css);
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    } else {
        tracing::warn!("no display available; runtime css not installed");
    }
}

fn runtime_css(tokens: StyleTokens, colors: &ColorTokens, presets: &[BackdropPreset]) -> String {
    let mut css = format!(
        "
window.frosted-root {{
  background: {canvas_background};
  color: {text_color};
}}
.frosted-root label {{
  color: {text_color};
}}
.control-sidebar {{
  background: {panel_background};
  border-right: {border_width}px solid {border_color};
  padding: {spacing_16}px;
}}
.control-card {{
  border-radius: {card_radius}px;
  border: {border_width}px solid {border_color};
  padding: {spacing_12}px;
}}
.section-title {{
  font-size: 12px;
  font-weight: 700;
  letter-spacing: 0.06em;
  opacity: 0.72;
  margin-bottom: {spacing_4}px;
}}
.control-title {{
  font-size: 13px;
}}
.readout {{
  font-size: 12px;
  font-weight: 600;
  opacity: 0.85;
}}
scale.control-slider trough {{
  min-height: 4px;
  border-radius: 2px;
}}
scale.control-slider highlight {{
  background-image: {accent_gradient};
  border-radius: 2px;
}}
button.preset-swatch {{
  min-width: {swatch_size}px;
  min-height: {swatch_size}px;
  padding: 0;
  border-radius: {control_radius}px;
  border: 2px solid {border_color};
  transition: border-color {motion_hover_ms}ms ease-out;
}}
button.preset-swatch:hover {{
  border-color: {focus_ring_color};
}}
textview.snippet-view,
textview.snippet-view text {{
  font-family: monospace;
  font-size: 12px;
  background: rgba(0, 0, 0, 0.18);
  color: {text_color};
}}
.snippet-frame {{
  border-radius: {control_radius}px;
  border: {border_width}px solid {border_color};
  min-height: {snippet_min_height}px;
}}
button.primary-button {{
  background-image: {accent_gradient};
  color: {accent_text_color};
  border-color: transparent;
  font-weight: 600;
  min-height: {control_size}px;
}}
button.primary-button label {{
  color: {accent_text_color};
}}
.frosted-root button:focus-visible,
.frosted-root scale:focus-visible,
.frosted-root checkbutton:focus-visible {{
  border-color: {focus_ring_color};
  box-shadow: 0 0 0 2px {focus_ring_glow};
}}
",
        canvas_background = colors.canvas_background,
        text_color = colors.text_color,
        panel_background = colors.panel_background,
        border_color = colors.border_color,
        accent_gradient = colors.accent_gradient,
        accent_text_color = colors.accent_text_color,
        focus_ring_color = colors.focus_ring_color,
        focus_ring_glow = colors.focus_ring_glow,
        border_width = tokens.border_width,
        card_radius = tokens.card_radius,
        control_radius = tokens.control_radius,
        control_size = tokens.control_size,
        swatch_size = tokens.swatch_size,
        snippet_min_height = tokens.snippet_min_height,
        spacing_4 = tokens.spacing_4,
        spacing_12 = tokens.spacing_12,
        spacing_16 = tokens.spacing_16,
        motion_hover_ms = tokens.motion_hover_ms,
    );

    for (index, preset) in presets.iter().enumerate() {
        let _ = writeln!(
            css,
            "button.{class} {{\n  background-image: {gradient};\n}}",
            class = preset_swatch_class(index),
            gradient = preset.css_gradient(),
        );
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::builtin_presets;
    use crate::theme::{default_color_tokens, ThemeMode};
    use crate::ui::LAYOUT_TOKENS;

    #[test]
    fn runtime_css_paints_every_preset_swatch() {
        let presets = builtin_presets();
        let css = runtime_css(
            LAYOUT_TOKENS,
            &default_color_tokens(ThemeMode::Dark),
            &presets,
        );
        for (index, preset) in presets.iter().enumerate() {
            let rule = format!(
                "button.preset-swatch-{index} {{\n  background-image: {};\n}}",
                preset.css_gradient()
            );
            assert!(css.contains(&rule), "missing rule for swatch {index}");
        }
    }

    #[test]
    fn runtime_css_uses_theme_colors() {
        let colors = default_color_tokens(ThemeMode::Light);
        let css = runtime_css(LAYOUT_TOKENS, &colors, &[]);
        assert!(css.contains(&format!("background: {};", colors.canvas_background)));
        assert!(!css.contains("preset-swatch-0"));
    }
}
