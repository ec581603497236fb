//! Geometry primitives shared by the viewport and the box manager.
//!
//! Everything here is plain data. Scene-space values are measured in the
//! loaded image's natural pixels; container-space values in on-screen pixels.

use image::GenericImageView;
use serde::{Deserialize, Serialize};

/// Two-sided clamp that never panics: `max(min, min(max, value))`.
///
/// When `min > max` the lower bound wins; a NaN `value` resolves to a bound.
pub(crate) fn clamp_between(value: f32, min: f32, max: f32) -> f32 {
    min.max(max.min(value))
}

/// Float rounding never moves a settled value more than a few ulps.
const SETTLE_STEPS: usize = 8;

/// Lower a non-negative `value` by whole ulps until `value + addend <= limit`
/// holds in `f32` arithmetic.
///
/// `limit - addend` can round up, so a position or extent computed from it
/// may overshoot `limit` by an ulp once added back.
pub(crate) fn settle_sum(value: f32, addend: f32, limit: f32) -> f32 {
    let mut value = value;
    for _ in 0..SETTLE_STEPS {
        if value <= 0.0 || value.is_nan() || value + addend <= limit {
            break;
        }
        value = f32::from_bits(value.to_bits() - 1);
    }
    value
}

// ============================================================================
// Point / Size
// ============================================================================

/// A 2D position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset this point by the given deltas.
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Uniformly scale both dimensions.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

// ============================================================================
// Rect
// ============================================================================

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    /// Width of the rectangle
    pub width: f32,
    /// Height of the rectangle
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Same size, moved to a new top-left corner.
    pub fn with_origin(&self, origin: Point) -> Self {
        Self::from_origin_size(origin, self.size())
    }

    /// Check if a point lies inside the rectangle (edges included).
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check that this rectangle lies entirely within `[0, bounds.width] x [0, bounds.height]`.
    pub fn is_within(&self, bounds: Size) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= bounds.width
            && self.bottom() <= bounds.height
    }

    /// Cut this rectangle down to the part inside `[0, bounds.width] x [0, bounds.height]`.
    ///
    /// Edges that already lie inside stay where they are, so a handle dragged
    /// past the scene edge stops at the edge instead of shifting the box.
    pub fn intersect_bounds(&self, bounds: Size) -> Self {
        let left = clamp_between(self.x, 0.0, bounds.width);
        let top = clamp_between(self.y, 0.0, bounds.height);
        let right = clamp_between(self.right(), left, bounds.width);
        let bottom = clamp_between(self.bottom(), top, bounds.height);
        Self::new(
            left,
            top,
            settle_sum(right - left, left, bounds.width),
            settle_sum(bottom - top, top, bounds.height),
        )
    }
}

// ============================================================================
// Scene dimensions
// ============================================================================

/// Natural pixel size of the loaded image.
///
/// Replaced wholesale whenever a new image is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SceneDimensions {
    pub width: u32,
    pub height: u32,
}

impl SceneDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Read the natural size of a decoded image.
    pub fn from_image(image: &image::DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Integer pixel region inside the scene, used for cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest pixel region covering `rect`, limited to the scene.
    pub fn covering(rect: &Rect, scene: SceneDimensions) -> Self {
        let max_x = scene.width as f32;
        let max_y = scene.height as f32;
        let left = clamp_between(rect.x.floor(), 0.0, max_x);
        let top = clamp_between(rect.y.floor(), 0.0, max_y);
        let right = clamp_between(rect.right().ceil(), left, max_x);
        let bottom = clamp_between(rect.bottom().ceil(), top, max_y);
        Self::new(
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0);
        assert!(rect.contains(&Point::new(50.0, 50.0)));
        assert!(rect.contains(&Point::new(10.0, 10.0))); // Edge
        assert!(!rect.contains(&Point::new(5.0, 50.0)));
    }

    #[test]
    fn test_rect_is_within() {
        let bounds = Size::new(100.0, 80.0);
        assert!(Rect::new(0.0, 0.0, 100.0, 80.0).is_within(bounds));
        assert!(!Rect::new(1.0, 0.0, 100.0, 80.0).is_within(bounds));
        assert!(!Rect::new(-1.0, 0.0, 10.0, 10.0).is_within(bounds));
    }

    #[test]
    fn test_intersect_bounds_keeps_inner_edges() {
        let bounds = Size::new(100.0, 100.0);
        let rect = Rect::new(80.0, -10.0, 50.0, 30.0).intersect_bounds(bounds);
        assert_eq!(rect, Rect::new(80.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn test_intersect_bounds_fully_outside_is_empty() {
        let rect = Rect::new(200.0, 200.0, 10.0, 10.0).intersect_bounds(Size::new(100.0, 100.0));
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
        assert!(rect.is_within(Size::new(100.0, 100.0)));
    }

    #[test]
    fn test_intersect_bounds_right_edge_stays_inside() {
        let bounds = Size::new(1000.0, 800.0);
        for step in 1..2000 {
            let x = step as f32 * 0.413;
            let y = step as f32 * 0.317;
            let rect = Rect::new(x, y, 5000.0, 5000.0).intersect_bounds(bounds);
            assert!(rect.is_within(bounds), "{rect:?}");
        }
    }

    #[test]
    fn test_settle_sum_leaves_fitting_values() {
        assert_eq!(settle_sum(300.0, 700.0, 1000.0), 300.0);
        assert_eq!(settle_sum(0.0, 2000.0, 1000.0), 0.0);
    }

    #[test]
    fn test_pixel_rect_rounds_outward() {
        let scene = SceneDimensions::new(100, 100);
        let px = PixelRect::covering(&Rect::new(10.4, 20.6, 5.2, 5.0), scene);
        assert_eq!(px, PixelRect::new(10, 20, 6, 6));
    }

    #[test]
    fn test_pixel_rect_limited_to_scene() {
        let scene = SceneDimensions::new(50, 40);
        let px = PixelRect::covering(&Rect::new(45.5, 35.5, 20.0, 20.0), scene);
        assert_eq!(px, PixelRect::new(45, 35, 5, 5));
    }

    #[test]
    fn test_scene_from_image() {
        let image = image::DynamicImage::new_rgb8(64, 32);
        assert_eq!(SceneDimensions::from_image(&image), SceneDimensions::new(64, 32));
    }
}
