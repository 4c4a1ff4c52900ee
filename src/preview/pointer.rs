use super::panel::PreviewPanel;
use crate::geometry::{PanelRect, Point};
use crate::settings::Settings;

/// Republishes the pointer position relative to the panel origin.
///
/// Does nothing unless the spotlight is enabled in `settings` at call time.
/// Returns whether the panel coordinates changed.
pub fn track_pointer(
    settings: &Settings,
    panel: &mut PreviewPanel,
    panel_rect: PanelRect,
    pointer: Point,
) -> bool {
    if !settings.is_spotlight {
        return false;
    }

    panel.publish_pointer(pointer.offset_from(panel_rect.origin()));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spotlight_settings(enabled: bool) -> Settings {
        Settings {
            is_spotlight: enabled,
            ..Settings::default()
        }
    }

    #[test]
    fn pointer_offset_is_published_when_spotlight_enabled() {
        let mut panel = PreviewPanel::default();
        let rect = PanelRect::new(100.0, 50.0, 350.0, 220.0);

        let updated = track_pointer(
            &spotlight_settings(true),
            &mut panel,
            rect,
            Point::new(142.0, 67.0),
        );

        assert!(updated);
        assert_eq!(panel.custom_property("--mouse-x"), Some("42px"));
        assert_eq!(panel.custom_property("--mouse-y"), Some("17px"));
    }

    #[test]
    fn pointer_is_ignored_when_spotlight_disabled() {
        let mut panel = PreviewPanel::default();
        let rect = PanelRect::new(100.0, 50.0, 350.0, 220.0);
        panel.publish_pointer(Point::new(5.0, 6.0));

        let updated = track_pointer(
            &spotlight_settings(false),
            &mut panel,
            rect,
            Point::new(142.0, 67.0),
        );

        assert!(!updated);
        assert_eq!(panel.custom_property("--mouse-x"), Some("5px"));
        assert_eq!(panel.custom_property("--mouse-y"), Some("6px"));
    }
}
