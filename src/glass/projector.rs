use super::color::{rgb_to_hex, Rgb};
use crate::settings::Settings;

/// Border paint is fixed; only its thickness follows the settings.
pub const BORDER_COLOR: &str = "rgba(255,255,255,0.3)";
pub const BORDER_RGB: Rgb = Rgb::WHITE;
pub const BORDER_ALPHA: f64 = 0.3;

/// Concrete visual declarations for the glass panel.
///
/// Numeric fields feed the cairo preview; the string accessors feed the
/// stylesheet snippet. Both come from the same values.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelStyle {
    pub tint: Rgb,
    pub alpha: f64,
    pub blur_px: f64,
    pub saturation_pct: f64,
    pub outline_px: f64,
    pub text: Rgb,
    pub width_px: f64,
    pub height_px: f64,
    pub radius_px: f64,
    pub interactive: bool,
}

impl PanelStyle {
    pub fn background(&self) -> String {
        let (r, g, b) = self.tint.rgb();
        format!("rgba({r}, {g}, {b}, {})", self.alpha)
    }

    pub fn backdrop_filter(&self) -> String {
        format!(
            "blur({}px) saturate({}%)",
            self.blur_px, self.saturation_pct
        )
    }

    pub fn border(&self) -> String {
        format!("{}px solid {BORDER_COLOR}", self.outline_px)
    }

    pub fn text_color(&self) -> String {
        rgb_to_hex(self.text.r, self.text.g, self.text.b)
    }

    /// Property/value pairs in the order the panel receives them.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        let backdrop_filter = self.backdrop_filter();
        vec![
            ("background", self.background()),
            ("backdrop-filter", backdrop_filter.clone()),
            ("-webkit-backdrop-filter", backdrop_filter),
            ("border", self.border()),
            ("width", format!("{}px", self.width_px)),
            ("height", format!("{}px", self.height_px)),
            ("border-radius", format!("{}px", self.radius_px)),
            ("color", self.text_color()),
        ]
    }
}

pub fn project(settings: &Settings) -> PanelStyle {
    PanelStyle {
        tint: settings.glass_color.rgb(),
        alpha: settings.transparency,
        blur_px: settings.blur,
        saturation_pct: settings.saturation,
        outline_px: settings.outline,
        text: if settings.is_light_text {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        },
        width_px: settings.width,
        height_px: settings.height,
        radius_px: settings.radius,
        interactive: settings.is_spotlight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_project_to_reference_strings() {
        let style = project(&Settings::default());
        assert_eq!(style.background(), "rgba(255, 255, 255, 0.25)");
        assert_eq!(style.backdrop_filter(), "blur(15px) saturate(180%)");
        assert_eq!(style.border(), "1px solid rgba(255,255,255,0.3)");
        assert_eq!(style.text_color(), "#ffffff");
        assert!(!style.interactive);
    }

    #[test]
    fn dark_text_and_custom_tint_are_projected() {
        let settings = Settings {
            glass_color: "#1e90ff".parse().unwrap(),
            transparency: 0.6,
            is_light_text: false,
            outline: 0.0,
            ..Settings::default()
        };
        let style = project(&settings);
        assert_eq!(style.background(), "rgba(30, 144, 255, 0.6)");
        assert_eq!(style.text_color(), "#000000");
        assert_eq!(style.border(), "0px solid rgba(255,255,255,0.3)");
    }

    #[test]
    fn spotlight_only_toggles_interactive_marker() {
        let off = project(&Settings::default());
        let on = project(&Settings {
            is_spotlight: true,
            ..Settings::default()
        });
        assert!(on.interactive);
        assert_eq!(off.declarations(), on.declarations());
    }

    #[test]
    fn declarations_carry_dimensions_in_pixels() {
        let style = project(&Settings {
            width: 420.0,
            height: 260.5,
            radius: 0.0,
            ..Settings::default()
        });
        let declarations = style.declarations();
        let value = |name: &str| {
            declarations
                .iter()
                .find(|(property, _)| *property == name)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(value("width"), Some("420px"));
        assert_eq!(value("height"), Some("260.5px"));
        assert_eq!(value("border-radius"), Some("0px"));
    }
}
