pub mod style;
pub mod widgets;

pub use crate::theme::{default_color_tokens, resolve_color_tokens, ColorTokens};
pub use style::{StyleTokens, LAYOUT_TOKENS};
pub use widgets::{readout_label, section_title, slider_row, SliderRow};
