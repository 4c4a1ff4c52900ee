mod backdrop;
mod panel;
mod pointer;

pub use backdrop::{
    builtin_presets, load_backdrop_image, presets_from_config, Backdrop, BackdropError,
    BackdropPreset, BackdropSelector, LoadTicket,
};
pub use panel::{PreviewPanel, INTERACTIVE_CLASS};
pub use pointer::track_pointer;
