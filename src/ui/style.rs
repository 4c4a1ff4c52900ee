/// Compile-time layout tokens, not user-overridable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub spacing_4: i32,
    pub spacing_8: i32,
    pub spacing_12: i32,
    pub spacing_16: i32,
    pub spacing_24: i32,
    pub card_radius: u16,
    pub control_radius: u16,
    pub control_size: u16,
    pub swatch_size: i32,
    pub border_width: u16,
    pub window_default_width: i32,
    pub window_default_height: i32,
    pub sidebar_width: i32,
    pub preview_min_width: i32,
    pub preview_min_height: i32,
    pub snippet_min_height: i32,
    pub motion_hover_ms: u32,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_4: 4,
    spacing_8: 8,
    spacing_12: 12,
    spacing_16: 16,
    spacing_24: 24,
    card_radius: 14,
    control_radius: 10,
    control_size: 36,
    swatch_size: 40,
    border_width: 1,
    window_default_width: 1280,
    window_default_height: 800,
    sidebar_width: 360,
    preview_min_width: 640,
    preview_min_height: 520,
    snippet_min_height: 220,
    motion_hover_ms: 160,
};

#[cfg(test)]
mod tests {
    use super::LAYOUT_TOKENS;

    #[test]
    fn preview_fits_largest_panel() {
        // Width and height sliders top out at 600 and 500.
        assert!(LAYOUT_TOKENS.preview_min_width >= 600);
        assert!(LAYOUT_TOKENS.preview_min_height >= 500);
    }

    #[test]
    fn window_holds_sidebar_and_preview() {
        let tokens = LAYOUT_TOKENS;
        assert!(
            tokens.window_default_width >= tokens.sidebar_width + tokens.preview_min_width
        );
        assert!(tokens.window_default_height >= tokens.preview_min_height);
    }
}
