use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::RgbaImage;
use thiserror::Error;

use crate::glass::{hex_to_rgb, rgb_to_hex, Rgb};

const MAX_PRESET_COUNT: usize = 8;
const MIN_PRESET_STOPS: usize = 2;

#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("failed to read backdrop image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode backdrop image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A diagonal gradient swatch shown behind the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackdropPreset {
    pub stops: Vec<Rgb>,
}

impl BackdropPreset {
    pub fn new(stops: Vec<Rgb>) -> Self {
        Self { stops }
    }

    /// CSS rendering of the swatch, used to paint the preset buttons.
    pub fn css_gradient(&self) -> String {
        let last = self.stops.len().saturating_sub(1).max(1);
        let stops = self
            .stops
            .iter()
            .enumerate()
            .map(|(index, stop)| {
                format!(
                    "{} {}%",
                    rgb_to_hex(stop.r, stop.g, stop.b),
                    index * 100 / last
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("linear-gradient(135deg, {stops})")
    }
}

pub fn builtin_presets() -> Vec<BackdropPreset> {
    [
        [Rgb::new(0x66, 0x7e, 0xea), Rgb::new(0x76, 0x4b, 0xa2)],
        [Rgb::new(0xff, 0x9a, 0x9e), Rgb::new(0xfa, 0xd0, 0xc4)],
        [Rgb::new(0x43, 0xe9, 0x7b), Rgb::new(0x38, 0xf9, 0xd7)],
        [Rgb::new(0x0f, 0x20, 0x27), Rgb::new(0x2c, 0x53, 0x64)],
    ]
    .into_iter()
    .map(|stops| BackdropPreset::new(stops.to_vec()))
    .collect()
}

/// Parses `backdrop_presets` from `config.json`, falling back to the
/// built-in swatches when nothing usable is configured.
pub fn presets_from_config(raw: Option<&[Vec<String>]>) -> Vec<BackdropPreset> {
    let Some(raw) = raw else {
        return builtin_presets();
    };

    let mut parsed = Vec::with_capacity(raw.len().min(MAX_PRESET_COUNT));
    for (index, entry) in raw.iter().enumerate() {
        if parsed.len() >= MAX_PRESET_COUNT {
            tracing::warn!(
                max = MAX_PRESET_COUNT,
                "backdrop_presets supports up to `max` presets; extra entries were ignored"
            );
            break;
        }
        let stops = entry
            .iter()
            .filter_map(|value| match hex_to_rgb(value.trim()) {
                Ok(rgb) => Some(rgb),
                Err(err) => {
                    tracing::warn!(index, %err, "ignoring invalid backdrop preset stop");
                    None
                }
            })
            .collect::<Vec<_>>();
        if stops.len() < MIN_PRESET_STOPS {
            tracing::warn!(index, "backdrop preset needs at least two valid stops; skipping");
            continue;
        }
        parsed.push(BackdropPreset::new(stops));
    }

    if parsed.is_empty() {
        tracing::warn!("no valid backdrop_presets configured; using built-in presets");
        return builtin_presets();
    }
    parsed
}

/// Reads and decodes an image file. Runs off the main thread.
pub fn load_backdrop_image(path: &Path) -> Result<RgbaImage, BackdropError> {
    let bytes = std::fs::read(path).map_err(|source| BackdropError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    image::load_from_memory(&bytes)
        .map(|decoded| decoded.to_rgba8())
        .map_err(|source| BackdropError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

#[derive(Debug, Clone)]
pub enum Backdrop {
    Preset(usize),
    Image(Rc<RgbaImage>),
}

/// Identifies one image load request; only the newest request may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
pub struct BackdropSelector {
    presets: Vec<BackdropPreset>,
    current: Backdrop,
    shapes_visible: bool,
    request_generation: u64,
    revision: u64,
}

impl BackdropSelector {
    pub fn new(presets: Vec<BackdropPreset>) -> Self {
        let presets = if presets.is_empty() {
            builtin_presets()
        } else {
            presets
        };
        Self {
            presets,
            current: Backdrop::Preset(0),
            shapes_visible: true,
            request_generation: 0,
            revision: 0,
        }
    }

    pub fn presets(&self) -> &[BackdropPreset] {
        &self.presets
    }

    pub fn current(&self) -> &Backdrop {
        &self.current
    }

    pub fn shapes_visible(&self) -> bool {
        self.shapes_visible
    }

    /// Bumped whenever the painted backdrop changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn select_preset(&mut self, index: usize) -> bool {
        if index >= self.presets.len() {
            tracing::warn!(index, count = self.presets.len(), "unknown backdrop preset");
            return false;
        }
        self.request_generation += 1;
        self.current = Backdrop::Preset(index);
        self.shapes_visible = true;
        self.revision += 1;
        true
    }

    pub fn begin_image_load(&mut self) -> LoadTicket {
        self.request_generation += 1;
        LoadTicket(self.request_generation)
    }

    /// Applies a finished load if no newer request superseded it.
    pub fn finish_image_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<RgbaImage, BackdropError>,
    ) -> bool {
        if ticket.0 != self.request_generation {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.request_generation,
                "discarding superseded backdrop image load"
            );
            return false;
        }

        match result {
            Ok(image) => {
                tracing::info!(
                    width = image.width(),
                    height = image.height(),
                    "applied uploaded backdrop image"
                );
                self.current = Backdrop::Image(Rc::new(image));
                self.shapes_visible = false;
                self.revision += 1;
                true
            }
            Err(err) => {
                tracing::warn!(%err, "backdrop image load failed; keeping current backdrop");
                false
            }
        }
    }
}
