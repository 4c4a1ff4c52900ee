use std::cell::RefCell;
use std::f64::consts::{FRAC_PI_2, PI};
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{cairo, DrawingArea, EventControllerMotion};
use image::RgbaImage;

use super::image_processing::{
    blur_region_for_preview, bounded_region, cairo_surface_region_to_rgba_image,
    rgba_image_to_cairo_surface, saturate_in_place,
};
use crate::geometry::{cover_placement, PanelRect, Point};
use crate::glass::{PanelStyle, Rgb, BORDER_ALPHA, BORDER_RGB};
use crate::preview::{Backdrop, BackdropPreset, BackdropSelector};
use crate::session::GlassSession;

const GRADIENT_ANGLE_DEG: f64 = 135.0;
const SPOTLIGHT_RADIUS: f64 = 600.0;
const SPOTLIGHT_FADE_STOP: f64 = 0.4;
const SPOTLIGHT_ALPHA: f64 = 0.2;
const SHADOW_OFFSET_Y: f64 = 8.0;
const SHADOW_SPREAD: f64 = 32.0;
const SHADOW_ALPHA: f64 = 0.3;
const SHADOW_LAYERS: u32 = 8;
const TITLE_TEXT: &str = "Glassmorphism";
const SUBTITLE_TEXT: &str = "Frosted glass preview";
const TITLE_FONT_SIZE: f64 = 26.0;
const SUBTITLE_FONT_SIZE: f64 = 14.0;

/// Decorative circles painted over preset backdrops, in fractions of the
/// canvas size.
#[derive(Debug, Clone, Copy)]
struct DecorativeShape {
    cx: f64,
    cy: f64,
    radius: f64,
    color: Rgb,
}

const DECORATIVE_SHAPES: [DecorativeShape; 3] = [
    DecorativeShape {
        cx: 0.28,
        cy: 0.30,
        radius: 0.16,
        color: Rgb::new(0xff, 0x6b, 0x9d),
    },
    DecorativeShape {
        cx: 0.72,
        cy: 0.70,
        radius: 0.20,
        color: Rgb::new(0x4f, 0xac, 0xfe),
    },
    DecorativeShape {
        cx: 0.66,
        cy: 0.24,
        radius: 0.08,
        color: Rgb::new(0xff, 0xd1, 0x66),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BackdropKey {
    width: i32,
    height: i32,
    revision: u64,
}

impl BackdropKey {
    fn new(backdrop: &BackdropSelector, width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            revision: backdrop.revision(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrostKey {
    backdrop: BackdropKey,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    blur_bits: u64,
    saturation_bits: u64,
}

#[derive(Debug, Clone)]
struct FrostEntry {
    key: FrostKey,
    surface: cairo::ImageSurface,
    x: i32,
    y: i32,
}

/// Keeps the painted backdrop and the blurred panel region between draws so
/// pointer motion only repaints the overlays.
#[derive(Debug, Default)]
pub(super) struct FrostRenderCache {
    backdrop: Option<(BackdropKey, cairo::ImageSurface)>,
    image: Option<(u64, cairo::ImageSurface)>,
    frost: Option<FrostEntry>,
}

impl FrostRenderCache {
    fn backdrop_surface(
        &mut self,
        backdrop: &BackdropSelector,
        width: i32,
        height: i32,
    ) -> Option<cairo::ImageSurface> {
        let key = BackdropKey::new(backdrop, width, height);
        if let Some((cached, surface)) = &self.backdrop {
            if *cached == key {
                return Some(surface.clone());
            }
        }

        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).ok()?;
        {
            let context = cairo::Context::new(&surface).ok()?;
            match backdrop.current() {
                Backdrop::Preset(index) => {
                    let preset = backdrop.presets().get(*index)?;
                    paint_preset_gradient(&context, preset, f64::from(width), f64::from(height));
                }
                Backdrop::Image(image) => {
                    let source = self.image_surface(backdrop.revision(), image)?;
                    paint_cover_image(&context, &source, f64::from(width), f64::from(height));
                }
            }
            if backdrop.shapes_visible() {
                paint_decorative_shapes(&context, f64::from(width), f64::from(height));
            }
        }
        surface.flush();

        tracing::trace!(width, height, revision = key.revision, "painted preview backdrop");
        self.backdrop = Some((key, surface.clone()));
        Some(surface)
    }

    fn image_surface(&mut self, revision: u64, image: &RgbaImage) -> Option<cairo::ImageSurface> {
        if let Some((cached, surface)) = &self.image {
            if *cached == revision {
                return Some(surface.clone());
            }
        }
        let surface = rgba_image_to_cairo_surface(image)?;
        self.image = Some((revision, surface.clone()));
        Some(surface)
    }

    fn frost_surface(
        &mut self,
        backdrop_key: BackdropKey,
        backdrop_surface: &cairo::ImageSurface,
        rect: PanelRect,
        style: &PanelStyle,
    ) -> Option<(cairo::ImageSurface, i32, i32)> {
        let (x, y, width, height) =
            bounded_region(rect, backdrop_surface.width(), backdrop_surface.height())?;
        let key = FrostKey {
            backdrop: backdrop_key,
            x,
            y,
            width,
            height,
            blur_bits: style.blur_px.to_bits(),
            saturation_bits: style.saturation_pct.to_bits(),
        };
        if let Some(entry) = &self.frost {
            if entry.key == key {
                return Some((entry.surface.clone(), entry.x, entry.y));
            }
        }

        let mut region = cairo_surface_region_to_rgba_image(backdrop_surface, x, y, width, height)?;
        region = blur_region_for_preview(&region, style.blur_px as f32);
        saturate_in_place(&mut region, style.saturation_pct);
        let surface = rgba_image_to_cairo_surface(&region)?;
        self.frost = Some(FrostEntry {
            key,
            surface: surface.clone(),
            x,
            y,
        });
        Some((surface, x, y))
    }
}

/// The live preview: backdrop, frosted panel and pointer highlight.
pub(super) struct PreviewCanvas {
    area: DrawingArea,
}

impl PreviewCanvas {
    pub(super) fn new(
        session: &Rc<RefCell<GlassSession>>,
        min_width: i32,
        min_height: i32,
    ) -> Self {
        let area = DrawingArea::new();
        area.set_size_request(min_width, min_height);
        area.set_hexpand(true);
        area.set_vexpand(true);
        area.add_css_class("preview-canvas");

        let cache = Rc::new(RefCell::new(FrostRenderCache::default()));
        {
            let session = session.clone();
            area.set_draw_func(move |_, context, width, height| {
                let session = session.borrow();
                draw_preview(context, width, height, &session, &mut cache.borrow_mut());
            });
        }

        let pointer = EventControllerMotion::new();
        {
            let session = session.clone();
            let area_weak = area.downgrade();
            pointer.connect_motion(move |_, x, y| {
                let Some(area) = area_weak.upgrade() else {
                    return;
                };
                let changed = {
                    let mut session = session.borrow_mut();
                    let rect =
                        session.panel_rect(f64::from(area.width()), f64::from(area.height()));
                    session.pointer_moved(rect, Point::new(x, y))
                };
                if changed {
                    area.queue_draw();
                }
            });
        }
        {
            let session = session.clone();
            let area_weak = area.downgrade();
            pointer.connect_leave(move |_| {
                if !session.borrow_mut().pointer_left() {
                    return;
                }
                if let Some(area) = area_weak.upgrade() {
                    area.queue_draw();
                }
            });
        }
        area.add_controller(pointer);

        Self { area }
    }

    pub(super) fn widget(&self) -> &DrawingArea {
        &self.area
    }

    pub(super) fn queue_redraw(&self) {
        self.area.queue_draw();
    }
}

fn draw_preview(
    context: &cairo::Context,
    width: i32,
    height: i32,
    session: &GlassSession,
    cache: &mut FrostRenderCache,
) {
    if width <= 0 || height <= 0 {
        return;
    }
    let Some(style) = session.panel().style() else {
        return;
    };
    let backdrop = session.backdrop();
    let Some(backdrop_surface) = cache.backdrop_surface(backdrop, width, height) else {
        tracing::warn!(width, height, "failed to paint preview backdrop");
        return;
    };

    if context.set_source_surface(&backdrop_surface, 0.0, 0.0).is_ok() {
        context.paint().ok();
    }

    let rect = session.panel_rect(f64::from(width), f64::from(height));
    paint_panel_shadow(context, rect, style.radius_px);

    context.save().ok();
    append_rounded_rect_path(context, rect, style.radius_px);
    context.clip();

    let backdrop_key = BackdropKey::new(backdrop, width, height);
    if let Some((frost, x, y)) = cache.frost_surface(backdrop_key, &backdrop_surface, rect, style) {
        if context
            .set_source_surface(&frost, f64::from(x), f64::from(y))
            .is_ok()
        {
            context.paint().ok();
        }
    }

    let (r, g, b) = style.tint.unit();
    context.set_source_rgba(r, g, b, style.alpha);
    context.paint().ok();

    paint_panel_text(context, rect, style.text);

    if session.panel().spotlight_visible() {
        if let Some(offset) = session.panel().pointer_offset() {
            paint_spotlight(context, rect.origin(), offset);
        }
    }
    context.restore().ok();

    if style.outline_px > 0.0 {
        let inset = style.outline_px / 2.0;
        let border_rect = PanelRect::new(
            rect.x + inset,
            rect.y + inset,
            (rect.width - style.outline_px).max(0.0),
            (rect.height - style.outline_px).max(0.0),
        );
        append_rounded_rect_path(context, border_rect, (style.radius_px - inset).max(0.0));
        let (r, g, b) = BORDER_RGB.unit();
        context.set_source_rgba(r, g, b, BORDER_ALPHA);
        context.set_line_width(style.outline_px);
        context.stroke().ok();
    }
}

/// Start and end points of a CSS `linear-gradient(<angle>deg, ...)` line.
fn css_gradient_line(width: f64, height: f64, angle_deg: f64) -> (Point, Point) {
    let angle = angle_deg.to_radians();
    let (dx, dy) = (angle.sin(), -angle.cos());
    let half_length = (width * dx.abs() + height * dy.abs()) / 2.0;
    let (cx, cy) = (width / 2.0, height / 2.0);
    (
        Point::new(cx - dx * half_length, cy - dy * half_length),
        Point::new(cx + dx * half_length, cy + dy * half_length),
    )
}

fn paint_preset_gradient(
    context: &cairo::Context,
    preset: &BackdropPreset,
    width: f64,
    height: f64,
) {
    let (start, end) = css_gradient_line(width, height, GRADIENT_ANGLE_DEG);
    let gradient = cairo::LinearGradient::new(start.x, start.y, end.x, end.y);
    let last = preset.stops.len().saturating_sub(1).max(1) as f64;
    for (index, stop) in preset.stops.iter().enumerate() {
        let (r, g, b) = stop.unit();
        gradient.add_color_stop_rgb(index as f64 / last, r, g, b);
    }
    if context.set_source(&gradient).is_ok() {
        context.paint().ok();
    }
}

fn paint_cover_image(
    context: &cairo::Context,
    source: &cairo::ImageSurface,
    width: f64,
    height: f64,
) {
    let Some(placement) = cover_placement(
        f64::from(source.width()),
        f64::from(source.height()),
        width,
        height,
    ) else {
        return;
    };
    context.save().ok();
    context.translate(placement.offset_x, placement.offset_y);
    context.scale(placement.scale, placement.scale);
    if context.set_source_surface(source, 0.0, 0.0).is_ok() {
        context.source().set_extend(cairo::Extend::Pad);
        context.paint().ok();
    }
    context.restore().ok();
}

fn paint_decorative_shapes(context: &cairo::Context, width: f64, height: f64) {
    let unit = width.min(height);
    for shape in DECORATIVE_SHAPES {
        let cx = shape.cx * width;
        let cy = shape.cy * height;
        let radius = shape.radius * unit;
        let (r, g, b) = shape.color.unit();
        let gradient = cairo::RadialGradient::new(cx, cy, 0.0, cx, cy, radius);
        gradient.add_color_stop_rgba(0.0, r, g, b, 0.95);
        gradient.add_color_stop_rgba(1.0, r, g, b, 0.75);
        context.new_sub_path();
        context.arc(cx, cy, radius, 0.0, 2.0 * PI);
        if context.set_source(&gradient).is_ok() {
            context.fill().ok();
        }
    }
}

fn paint_panel_shadow(context: &cairo::Context, rect: PanelRect, radius: f64) {
    let step = SHADOW_SPREAD / f64::from(SHADOW_LAYERS);
    let alpha = SHADOW_ALPHA / f64::from(SHADOW_LAYERS);
    for layer in (1..=SHADOW_LAYERS).rev() {
        let grow = step * f64::from(layer) / 2.0;
        let shadow = PanelRect::new(
            rect.x - grow,
            rect.y + SHADOW_OFFSET_Y - grow,
            rect.width + grow * 2.0,
            rect.height + grow * 2.0,
        );
        append_rounded_rect_path(context, shadow, radius + grow);
        context.set_source_rgba(0.0, 0.0, 0.0, alpha);
        context.fill().ok();
    }
}

fn paint_panel_text(context: &cairo::Context, rect: PanelRect, color: Rgb) {
    let (r, g, b) = color.unit();
    context.set_source_rgb(r, g, b);
    let center_x = rect.x + rect.width / 2.0;
    let center_y = rect.y + rect.height / 2.0;

    context.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    context.set_font_size(TITLE_FONT_SIZE);
    let title_width = context
        .text_extents(TITLE_TEXT)
        .map(|extents| extents.x_advance())
        .unwrap_or(0.0);
    context.move_to(center_x - title_width / 2.0, center_y);
    let _ = context.show_text(TITLE_TEXT);

    context.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
    context.set_font_size(SUBTITLE_FONT_SIZE);
    let subtitle_width = context
        .text_extents(SUBTITLE_TEXT)
        .map(|extents| extents.x_advance())
        .unwrap_or(0.0);
    context.move_to(
        center_x - subtitle_width / 2.0,
        center_y + SUBTITLE_FONT_SIZE * 1.8,
    );
    let _ = context.show_text(SUBTITLE_TEXT);
}

fn paint_spotlight(context: &cairo::Context, origin: Point, offset: Point) {
    let cx = origin.x + offset.x;
    let cy = origin.y + offset.y;
    let gradient = cairo::RadialGradient::new(cx, cy, 0.0, cx, cy, SPOTLIGHT_RADIUS);
    gradient.add_color_stop_rgba(0.0, 1.0, 1.0, 1.0, SPOTLIGHT_ALPHA);
    gradient.add_color_stop_rgba(SPOTLIGHT_FADE_STOP, 1.0, 1.0, 1.0, 0.0);
    if context.set_source(&gradient).is_ok() {
        context.paint().ok();
    }
}

fn effective_corner_radius(width: f64, height: f64, radius: f64) -> f64 {
    radius.max(0.0).min(width.min(height) / 2.0)
}

fn append_rounded_rect_path(context: &cairo::Context, rect: PanelRect, radius: f64) {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }
    let radius = effective_corner_radius(rect.width, rect.height, radius);
    if radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;
    context.new_sub_path();
    context.arc(right - radius, rect.y + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(rect.x + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(rect.x + radius, rect.y + radius, radius, PI, PI * 1.5);
    context.close_path();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glass::project;
    use crate::preview::builtin_presets;
    use crate::settings::Settings;

    fn same_surface(a: &cairo::ImageSurface, b: &cairo::ImageSurface) -> bool {
        a.to_raw_none() == b.to_raw_none()
    }

    #[test]
    fn gradient_line_spans_square_corners() {
        let (start, end) = css_gradient_line(100.0, 100.0, 135.0);
        assert!(start.x.abs() < 1e-9 && start.y.abs() < 1e-9);
        assert!((end.x - 100.0).abs() < 1e-9 && (end.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn corner_radius_clamps_to_half_of_shorter_side() {
        assert_eq!(effective_corner_radius(20.0, 10.0, 999.0), 5.0);
        assert_eq!(effective_corner_radius(350.0, 220.0, 20.0), 20.0);
        assert_eq!(effective_corner_radius(350.0, 220.0, -4.0), 0.0);
    }

    #[test]
    fn backdrop_surface_is_reused_until_revision_changes() {
        let mut cache = FrostRenderCache::default();
        let mut selector = BackdropSelector::new(builtin_presets());

        let first = cache.backdrop_surface(&selector, 64, 48).unwrap();
        let again = cache.backdrop_surface(&selector, 64, 48).unwrap();
        assert!(same_surface(&first, &again));

        selector.select_preset(1);
        let repainted = cache.backdrop_surface(&selector, 64, 48).unwrap();
        assert!(!same_surface(&first, &repainted));
    }

    #[test]
    fn frost_surface_tracks_blur_changes() {
        let mut cache = FrostRenderCache::default();
        let selector = BackdropSelector::new(builtin_presets());
        let backdrop = cache.backdrop_surface(&selector, 120, 90).unwrap();
        let key = BackdropKey::new(&selector, 120, 90);
        let rect = PanelRect::centered_in(120.0, 90.0, 60.0, 40.0);
        let style = project(&Settings::default());

        let (frost, x, y) = cache.frost_surface(key, &backdrop, rect, &style).unwrap();
        assert_eq!((x, y), (30, 25));
        assert_eq!((frost.width(), frost.height()), (60, 40));
        let (cached, _, _) = cache.frost_surface(key, &backdrop, rect, &style).unwrap();
        assert!(same_surface(&frost, &cached));

        let sharper = project(&Settings {
            blur: 2.0,
            ..Settings::default()
        });
        let (rebuilt, _, _) = cache.frost_surface(key, &backdrop, rect, &sharper).unwrap();
        assert!(!same_surface(&frost, &rebuilt));
    }

    #[test]
    fn image_backdrop_covers_canvas() {
        let mut cache = FrostRenderCache::default();
        let mut selector = BackdropSelector::new(builtin_presets());
        let ticket = selector.begin_image_load();
        let mut upload = RgbaImage::new(10, 20);
        for pixel in upload.pixels_mut() {
            *pixel = image::Rgba([0, 0, 255, 255]);
        }
        assert!(selector.finish_image_load(ticket, Ok(upload)));

        let surface = cache.backdrop_surface(&selector, 40, 30).unwrap();
        let corner = cairo_surface_region_to_rgba_image(&surface, 0, 0, 1, 1).unwrap();
        assert_eq!(corner.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }
}
