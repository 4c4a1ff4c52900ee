use std::fmt::Write as _;

use super::projector::PanelStyle;
use crate::settings::Settings;

pub const PANEL_SELECTOR: &str = ".glass-card";
pub const POINTER_X_VAR: &str = "--mouse-x";
pub const POINTER_Y_VAR: &str = "--mouse-y";
const PANEL_SHADOW: &str = "0 8px 32px 0 rgba(0, 0, 0, 0.3)";

/// Renders the copyable stylesheet for the panel.
///
/// `style` must be the projection of `settings` so the text matches what the
/// preview shows.
pub fn render_snippet(settings: &Settings, style: &PanelStyle) -> String {
    let backdrop_filter = style.backdrop_filter();
    let mut css = format!(
        "{PANEL_SELECTOR} {{
    width: {width}px;
    height: {height}px;
    color: {color};
    background: {background};
    backdrop-filter: {backdrop_filter};
    -webkit-backdrop-filter: {backdrop_filter};
    border: {border};
    border-radius: {radius}px;
    box-shadow: {PANEL_SHADOW};
    position: relative;
    overflow: hidden;
}}",
        width = settings.width,
        height = settings.height,
        color = style.text_color(),
        background = style.background(),
        border = style.border(),
        radius = settings.radius,
    );

    if settings.is_spotlight {
        append_spotlight_block(&mut css);
    }
    css
}

fn append_spotlight_block(css: &mut String) {
    // Writing into a String cannot fail.
    let _ = write!(
        css,
        "

/* Spotlight effect */
{PANEL_SELECTOR}::before {{
    content: '';
    position: absolute;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    background: radial-gradient(
        600px circle at var({POINTER_X_VAR}) var({POINTER_Y_VAR}),
        rgba(255, 255, 255, 0.2),
        transparent 40%
    );
    opacity: 0;
    transition: opacity 0.3s;
    pointer-events: none;
    z-index: 2;
}}

{PANEL_SELECTOR}:hover::before {{
    opacity: 1;
}}

/* Note: a pointer-tracking script must keep {POINTER_X_VAR} and {POINTER_Y_VAR} updated on {PANEL_SELECTOR} */"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glass::project;

    fn snippet_for(settings: &Settings) -> String {
        render_snippet(settings, &project(settings))
    }

    #[test]
    fn default_snippet_has_base_block_only() {
        let css = snippet_for(&Settings::default());
        assert!(css.starts_with(".glass-card {\n    width: 350px;\n    height: 220px;\n"));
        assert!(css.contains("    color: #ffffff;\n"));
        assert!(css.contains("    background: rgba(255, 255, 255, 0.25);\n"));
        assert!(css.contains("    backdrop-filter: blur(15px) saturate(180%);\n"));
        assert!(css.contains("    -webkit-backdrop-filter: blur(15px) saturate(180%);\n"));
        assert!(css.contains("    border: 1px solid rgba(255,255,255,0.3);\n"));
        assert!(css.contains("    border-radius: 20px;\n"));
        assert!(css.contains("    box-shadow: 0 8px 32px 0 rgba(0, 0, 0, 0.3);\n"));
        assert!(css.ends_with("    position: relative;\n    overflow: hidden;\n}"));
        assert!(!css.contains("::before"));
    }

    #[test]
    fn spotlight_appends_exactly_one_pseudo_element_block() {
        let off = snippet_for(&Settings::default());
        let on = snippet_for(&Settings {
            is_spotlight: true,
            ..Settings::default()
        });

        assert!(on.starts_with(&off));
        assert_eq!(on.matches("::before {").count(), 2);
        assert_eq!(on.matches(".glass-card::before {").count(), 1);
        assert!(on.contains("var(--mouse-x)"));
        assert!(on.contains("var(--mouse-y)"));
        assert!(on.contains(".glass-card:hover::before {\n    opacity: 1;\n}"));
        assert!(on.contains("pointer-events: none;"));
        assert!(on.contains("\n    opacity: 0;\n    transition: opacity 0.3s;\n"));
        assert!(on.contains("\n    z-index: 2;\n"));
        assert!(on.contains("600px circle at var(--mouse-x) var(--mouse-y),"));
    }

    #[test]
    fn spotlight_block_ends_with_pointer_tracking_note() {
        let on = snippet_for(&Settings {
            is_spotlight: true,
            ..Settings::default()
        });
        let note = on.lines().last().unwrap_or_default();
        assert!(note.starts_with("/* Note:"), "unexpected last line: {note}");
        assert!(note.ends_with("*/"));
        assert!(note.contains("--mouse-x") && note.contains("--mouse-y"));
        assert!(note.contains("updated"));
        assert!(!snippet_for(&Settings::default()).contains("/* Note:"));
    }

    #[test]
    fn snippet_is_deterministic_and_trimmed() {
        let settings = Settings {
            is_spotlight: true,
            transparency: 0.4,
            ..Settings::default()
        };
        let first = snippet_for(&settings);
        assert_eq!(first, snippet_for(&settings));
        assert!(first.lines().all(|line| line == line.trim_end()));
    }
}
