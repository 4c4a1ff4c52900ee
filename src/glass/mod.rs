//! Pure projections from [`Settings`](crate::settings::Settings) to panel
//! styling and stylesheet text.

pub mod color;
pub mod projector;
pub mod snippet;

pub use color::{hex_to_rgb, rgb_to_hex, ColorError, HexColor, Rgb};
pub use projector::{project, PanelStyle, BORDER_ALPHA, BORDER_RGB};
pub use snippet::{render_snippet, POINTER_X_VAR, POINTER_Y_VAR};
