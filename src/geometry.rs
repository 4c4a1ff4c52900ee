//! Shared geometric primitives used by the preview model and canvas.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PanelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `width` x `height` rectangle centered in the given area.
    pub fn centered_in(area_width: f64, area_height: f64, width: f64, height: f64) -> Self {
        Self::new(
            (area_width - width) / 2.0,
            (area_height - height) / 2.0,
            width,
            height,
        )
    }

    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

/// Scale and offset that make a source image cover the target area, centered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverPlacement {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

pub fn cover_placement(
    source_width: f64,
    source_height: f64,
    target_width: f64,
    target_height: f64,
) -> Option<CoverPlacement> {
    if source_width <= 0.0 || source_height <= 0.0 || target_width <= 0.0 || target_height <= 0.0
    {
        return None;
    }

    let scale = (target_width / source_width).max(target_height / source_height);
    Some(CoverPlacement {
        scale,
        offset_x: (target_width - source_width * scale) / 2.0,
        offset_y: (target_height - source_height * scale) / 2.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_splits_remaining_space() {
        let rect = PanelRect::centered_in(800.0, 600.0, 350.0, 220.0);
        assert_eq!(rect.origin(), Point::new(225.0, 190.0));
        assert!(rect.contains(Point::new(225.0, 190.0)));
        assert!(!rect.contains(Point::new(575.0, 200.0)));
    }

    #[test]
    fn cover_placement_fills_and_centers() {
        let wide = cover_placement(200.0, 100.0, 100.0, 100.0).unwrap();
        assert_eq!(wide.scale, 1.0);
        assert_eq!(wide.offset_x, -50.0);
        assert_eq!(wide.offset_y, 0.0);

        let small = cover_placement(50.0, 50.0, 200.0, 100.0).unwrap();
        assert_eq!(small.scale, 4.0);
        assert_eq!(small.offset_x, 0.0);
        assert_eq!(small.offset_y, -50.0);

        assert!(cover_placement(0.0, 10.0, 10.0, 10.0).is_none());
    }
}
