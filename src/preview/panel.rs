use std::collections::{BTreeMap, BTreeSet};

use crate::geometry::Point;
use crate::glass::{PanelStyle, POINTER_X_VAR, POINTER_Y_VAR};

pub const INTERACTIVE_CLASS: &str = "interactive";

/// The panel element being previewed: its applied declarations, marker
/// classes and custom properties.
#[derive(Debug, Clone, Default)]
pub struct PreviewPanel {
    style: Option<PanelStyle>,
    declarations: Vec<(&'static str, String)>,
    classes: BTreeSet<&'static str>,
    custom_properties: BTreeMap<&'static str, String>,
    pointer_offset: Option<Point>,
    hovered: bool,
}

impl PreviewPanel {
    pub fn apply_style(&mut self, style: PanelStyle) {
        self.declarations = style.declarations();
        if style.interactive {
            self.classes.insert(INTERACTIVE_CLASS);
        } else {
            self.classes.remove(INTERACTIVE_CLASS);
        }
        self.style = Some(style);
    }

    pub fn style(&self) -> Option<&PanelStyle> {
        self.style.as_ref()
    }

    pub fn declarations(&self) -> &[(&'static str, String)] {
        &self.declarations
    }

    pub fn declaration(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_interactive(&self) -> bool {
        self.has_class(INTERACTIVE_CLASS)
    }

    pub fn custom_property(&self, name: &str) -> Option<&str> {
        self.custom_properties.get(name).map(String::as_str)
    }

    /// Publishes a panel-relative pointer position as the two coordinate
    /// properties, replacing earlier values.
    pub fn publish_pointer(&mut self, offset: Point) {
        self.custom_properties
            .insert(POINTER_X_VAR, format!("{}px", offset.x));
        self.custom_properties
            .insert(POINTER_Y_VAR, format!("{}px", offset.y));
        self.pointer_offset = Some(offset);
    }

    pub fn pointer_offset(&self) -> Option<Point> {
        self.pointer_offset
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the spotlight highlight should be painted right now.
    pub fn spotlight_visible(&self) -> bool {
        self.is_interactive() && self.hovered && self.pointer_offset.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glass::project;
    use crate::settings::Settings;

    #[test]
    fn apply_style_toggles_interactive_marker() {
        let mut panel = PreviewPanel::default();
        panel.apply_style(project(&Settings {
            is_spotlight: true,
            ..Settings::default()
        }));
        assert!(panel.is_interactive());
        assert_eq!(panel.declaration("width"), Some("350px"));

        panel.apply_style(project(&Settings::default()));
        assert!(!panel.is_interactive());
    }

    #[test]
    fn publish_pointer_overwrites_previous_coordinates() {
        let mut panel = PreviewPanel::default();
        panel.publish_pointer(Point::new(3.0, 4.0));
        panel.publish_pointer(Point::new(10.5, 0.0));
        assert_eq!(panel.custom_property("--mouse-x"), Some("10.5px"));
        assert_eq!(panel.custom_property("--mouse-y"), Some("0px"));
        assert_eq!(panel.pointer_offset(), Some(Point::new(10.5, 0.0)));
    }

    #[test]
    fn spotlight_requires_marker_hover_and_coordinates() {
        let mut panel = PreviewPanel::default();
        panel.apply_style(project(&Settings {
            is_spotlight: true,
            ..Settings::default()
        }));
        panel.set_hovered(true);
        assert!(!panel.spotlight_visible());

        panel.publish_pointer(Point::new(1.0, 1.0));
        assert!(panel.spotlight_visible());

        panel.set_hovered(false);
        assert!(!panel.spotlight_visible());
    }
}
