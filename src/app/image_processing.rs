use gtk4::cairo;
use image::{imageops, RgbaImage};

use crate::geometry::PanelRect;

pub(super) fn preview_blur_downsample_factor(width: u32, height: u32, sigma: f32) -> u32 {
    let area = width.saturating_mul(height);
    if area < 32_768 || sigma < 6.0 {
        return 1;
    }
    if area >= 262_144 && sigma >= 10.0 {
        return 4;
    }
    if area >= 65_536 && sigma >= 8.0 {
        return 3;
    }
    2
}

/// Gaussian blur sized for interactive repaints; heavy blurs run on a
/// downsampled copy and are scaled back to the original dimensions.
pub(super) fn blur_region_for_preview(region: &RgbaImage, sigma: f32) -> RgbaImage {
    if sigma <= 0.0 {
        return region.clone();
    }
    let width = region.width();
    let height = region.height();
    let downsample = preview_blur_downsample_factor(width, height, sigma)
        .min(width.max(1))
        .min(height.max(1));
    if downsample <= 1 {
        return imageops::blur(region, sigma);
    }

    let reduced_width = (width / downsample).max(1);
    let reduced_height = (height / downsample).max(1);
    let reduced = imageops::resize(
        region,
        reduced_width,
        reduced_height,
        imageops::FilterType::Triangle,
    );
    let reduced_sigma = (sigma / downsample as f32).max(0.8);
    let blurred = imageops::blur(&reduced, reduced_sigma);
    imageops::resize(&blurred, width, height, imageops::FilterType::Triangle)
}

/// Applies the `saturate(<percent>%)` filter matrix to every pixel.
pub(super) fn saturate_in_place(image: &mut RgbaImage, percent: f64) {
    let s = (percent / 100.0).max(0.0);
    if (s - 1.0).abs() < f64::EPSILON {
        return;
    }
    let matrix = [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ];
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
        for (channel, row) in pixel.0.iter_mut().zip(matrix.iter()) {
            let value = row[0] * r + row[1] * g + row[2] * b;
            *channel = value.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Clamps a floating panel rectangle to whole pixels inside the source.
pub(super) fn bounded_region(
    rect: PanelRect,
    source_width: i32,
    source_height: i32,
) -> Option<(i32, i32, u32, u32)> {
    if rect.width <= 0.0 || rect.height <= 0.0 || source_width <= 0 || source_height <= 0 {
        return None;
    }

    let left = (rect.x.floor() as i32).clamp(0, source_width.saturating_sub(1));
    let top = (rect.y.floor() as i32).clamp(0, source_height.saturating_sub(1));
    let right = ((rect.x + rect.width).ceil() as i32).clamp(left, source_width);
    let bottom = ((rect.y + rect.height).ceil() as i32).clamp(top, source_height);
    let width = u32::try_from(right - left).ok()?;
    let height = u32::try_from(bottom - top).ok()?;

    if width == 0 || height == 0 {
        return None;
    }

    Some((left, top, width, height))
}

/// Copies a region of an ARGB32 surface into straight-alpha RGBA.
pub(super) fn cairo_surface_region_to_rgba_image(
    surface: &cairo::ImageSurface,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
) -> Option<RgbaImage> {
    let stride = usize::try_from(surface.stride()).ok()?;
    let source_width = usize::try_from(surface.width()).ok()?;
    let source_height = usize::try_from(surface.height()).ok()?;
    let x = usize::try_from(x).ok()?;
    let y = usize::try_from(y).ok()?;
    let width = usize::try_from(width).ok()?;
    let height = usize::try_from(height).ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    if x.checked_add(width)? > source_width || y.checked_add(height)? > source_height {
        return None;
    }

    let row_len = width.checked_mul(4)?;
    let mut rgba_bytes = vec![0_u8; row_len.checked_mul(height)?];
    let mut copied = false;

    surface.flush();
    surface
        .with_data(|data| {
            for row in 0..height {
                let src_offset = (y + row) * stride + x * 4;
                let src_end = src_offset + row_len;
                if src_end > data.len() {
                    return;
                }
                let src_row = &data[src_offset..src_end];
                let dst_row = &mut rgba_bytes[row * row_len..(row + 1) * row_len];
                for (src_pixel, dst_pixel) in
                    src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4))
                {
                    let a = src_pixel[3];
                    let unpremultiply = |channel: u8| -> u8 {
                        match a {
                            0 => 0,
                            255 => channel,
                            _ => ((u16::from(channel) * 255 + u16::from(a) / 2) / u16::from(a))
                                .min(255) as u8,
                        }
                    };
                    dst_pixel[0] = unpremultiply(src_pixel[2]);
                    dst_pixel[1] = unpremultiply(src_pixel[1]);
                    dst_pixel[2] = unpremultiply(src_pixel[0]);
                    dst_pixel[3] = a;
                }
            }
            copied = true;
        })
        .ok()?;

    if !copied {
        return None;
    }
    RgbaImage::from_raw(u32::try_from(width).ok()?, u32::try_from(height).ok()?, rgba_bytes)
}

pub(super) fn rgba_image_to_cairo_surface(image: &RgbaImage) -> Option<cairo::ImageSurface> {
    let width = i32::try_from(image.width()).ok()?;
    let height = i32::try_from(image.height()).ok()?;
    let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).ok()?;
    let stride = usize::try_from(surface.stride()).ok()?;

    {
        let mut data = surface.data().ok()?;
        let image_width = usize::try_from(image.width()).ok()?;
        let image_height = usize::try_from(image.height()).ok()?;
        let src_row_len = image_width.checked_mul(4)?;
        let src = image.as_raw();

        for row in 0..image_height {
            let src_row_offset = row.checked_mul(src_row_len)?;
            let src_row_end = src_row_offset.checked_add(src_row_len)?;
            if src_row_end > src.len() {
                return None;
            }

            let dst_row_offset = row.checked_mul(stride)?;
            let dst_row_end = dst_row_offset.checked_add(src_row_len)?;
            if dst_row_end > data.len() {
                return None;
            }

            let src_row = &src[src_row_offset..src_row_end];
            let dst_row = &mut data[dst_row_offset..dst_row_end];

            for (src_pixel, dst_pixel) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4)) {
                let [r, g, b, a] = [src_pixel[0], src_pixel[1], src_pixel[2], src_pixel[3]];
                match a {
                    0 => dst_pixel.copy_from_slice(&[0, 0, 0, 0]),
                    255 => dst_pixel.copy_from_slice(&[b, g, r, 255]),
                    _ => {
                        let alpha = u16::from(a);
                        let premultiply = |channel: u8| ((u16::from(channel) * alpha + 127) / 255) as u8;
                        dst_pixel.copy_from_slice(&[premultiply(b), premultiply(g), premultiply(r), a]);
                    }
                }
            }
        }
    }

    surface.flush();
    Some(surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        let mut region = RgbaImage::new(width, height);
        for pixel in region.pixels_mut() {
            *pixel = image::Rgba(rgba);
        }
        region
    }

    #[test]
    fn preview_blur_downsample_factor_uses_larger_factor_for_heavier_regions() {
        assert_eq!(preview_blur_downsample_factor(128, 128, 5.5), 1);
        assert_eq!(preview_blur_downsample_factor(320, 240, 7.0), 2);
        assert_eq!(preview_blur_downsample_factor(320, 240, 8.2), 3);
        assert_eq!(preview_blur_downsample_factor(900, 700, 10.0), 4);
    }

    #[test]
    fn blur_region_for_preview_preserves_original_size() {
        let region = solid(350, 220, [180, 120, 50, 255]);
        let blurred = blur_region_for_preview(&region, 15.0);
        assert_eq!(blurred.dimensions(), region.dimensions());
    }

    #[test]
    fn zero_blur_leaves_region_untouched() {
        let mut region = solid(8, 8, [10, 20, 30, 255]);
        region.put_pixel(3, 3, image::Rgba([250, 0, 0, 255]));
        assert_eq!(blur_region_for_preview(&region, 0.0), region);
    }

    #[test]
    fn full_desaturation_produces_grey() {
        let mut region = solid(2, 2, [200, 40, 90, 255]);
        saturate_in_place(&mut region, 0.0);
        let [r, g, b, a] = region.get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
    }

    #[test]
    fn saturation_boost_pushes_channels_apart() {
        let mut region = solid(1, 1, [160, 120, 100, 255]);
        saturate_in_place(&mut region, 180.0);
        let [r, _, b, _] = region.get_pixel(0, 0).0;
        assert!(r > 160);
        assert!(b < 100);

        let mut unchanged = solid(1, 1, [160, 120, 100, 255]);
        saturate_in_place(&mut unchanged, 100.0);
        assert_eq!(unchanged.get_pixel(0, 0).0, [160, 120, 100, 255]);
    }

    #[test]
    fn bounded_region_clamps_to_source_dimensions() {
        let rect = PanelRect::new(-5.0, -10.0, 200.0, 120.0);
        assert_eq!(bounded_region(rect, 64, 48), Some((0, 0, 64, 48)));

        let inner = PanelRect::new(10.5, 4.0, 20.0, 10.0);
        assert_eq!(bounded_region(inner, 64, 48), Some((10, 4, 21, 10)));
        assert_eq!(bounded_region(PanelRect::new(0.0, 0.0, 0.0, 4.0), 64, 48), None);
    }

    #[test]
    fn opaque_pixels_survive_surface_conversion() {
        let mut region = solid(6, 4, [12, 140, 230, 255]);
        region.put_pixel(5, 3, image::Rgba([255, 0, 7, 255]));
        let surface = rgba_image_to_cairo_surface(&region).unwrap();

        let whole = cairo_surface_region_to_rgba_image(&surface, 0, 0, 6, 4).unwrap();
        assert_eq!(whole, region);

        let corner = cairo_surface_region_to_rgba_image(&surface, 5, 3, 1, 1).unwrap();
        assert_eq!(corner.get_pixel(0, 0).0, [255, 0, 7, 255]);
        assert!(cairo_surface_region_to_rgba_image(&surface, 4, 0, 4, 1).is_none());
    }
}
