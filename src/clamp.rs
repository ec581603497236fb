//! Bounds clamping for panned and dragged content.
//!
//! One rule covers both the whole-scene pan and per-box drags. Along each
//! axis the child origin may travel between the parent origin and the point
//! where the child's trailing edge meets the parent's trailing edge:
//!
//! ```text
//! P = parent_size * fit_scale
//! C = child_size  * fit_scale * zoom_factor
//! min = origin + min(0, P - C)
//! max = origin + max(0, P - C)
//! ```
//!
//! A child smaller than its parent is kept inside it (a box inside the
//! scene). A child larger than its parent is kept covering it (a zoomed-in
//! scene inside the container), so no empty margin can appear.

use crate::geometry::{Point, Size, clamp_between, settle_sum};

/// The parent's scale, split into its fit-to-container and user zoom parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentScale {
    /// Scale that makes the scene fill the container width
    pub fit_scale: f32,
    /// User zoom multiplier on top of `fit_scale`
    pub zoom_factor: f32,
}

impl ParentScale {
    pub fn new(fit_scale: f32, zoom_factor: f32) -> Self {
        Self {
            fit_scale,
            zoom_factor,
        }
    }

    /// Unscaled parent, used when positioning in scene space.
    pub fn identity() -> Self {
        Self::new(1.0, 1.0)
    }

    /// The combined render scale.
    pub fn effective(&self) -> f32 {
        self.fit_scale * self.zoom_factor
    }
}

impl Default for ParentScale {
    fn default() -> Self {
        Self::identity()
    }
}

/// Legal range for one coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: f32,
    pub max: f32,
}

impl AxisBounds {
    /// Bounds for a child of extent `child_extent` placed in a parent of
    /// extent `parent_extent` starting at `origin`. Extents are in the same units.
    pub fn new(origin: f32, parent_extent: f32, child_extent: f32) -> Self {
        let span = parent_extent - child_extent;
        Self {
            min: origin + span.min(0.0),
            max: origin + span.max(0.0),
        }
    }

    /// Bounds for one axis given unscaled sizes and the parent's scale.
    pub fn scaled(origin: f32, parent_size: f32, child_size: f32, scale: ParentScale) -> Self {
        Self::new(
            origin,
            parent_size * scale.fit_scale,
            child_size * scale.effective(),
        )
    }

    /// Two-sided clamp: `max(min, min(max, value))`.
    pub fn clamp(&self, value: f32) -> f32 {
        clamp_between(value, self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Clamp a candidate position so the child stays legal inside its parent.
///
/// * `pos` - Candidate top-left position of the child
/// * `shape_size` - Unscaled size of the child
/// * `parent_position` - Origin the bounds are measured from
/// * `parent_size` - Unscaled size of the parent
/// * `scale` - The parent's fit and zoom scales
///
/// Pure and idempotent: clamping a legal position returns it unchanged.
pub fn clamp_bounds(
    pos: Point,
    shape_size: Size,
    parent_position: Point,
    parent_size: Size,
    scale: ParentScale,
) -> Point {
    let (x_bounds, y_bounds) = bounds_for(shape_size, parent_position, parent_size, scale);
    Point::new(x_bounds.clamp(pos.x), y_bounds.clamp(pos.y))
}

/// Per-axis bounds used by [`clamp_bounds`].
pub fn bounds_for(
    shape_size: Size,
    parent_position: Point,
    parent_size: Size,
    scale: ParentScale,
) -> (AxisBounds, AxisBounds) {
    (
        AxisBounds::scaled(parent_position.x, parent_size.width, shape_size.width, scale),
        AxisBounds::scaled(parent_position.y, parent_size.height, shape_size.height, scale),
    )
}

/// Legal pan range for the whole scene inside a container sized to the fitted scene.
pub fn pan_bounds(scene: Size, scale: ParentScale) -> (AxisBounds, AxisBounds) {
    bounds_for(scene, Point::ORIGIN, scene, scale)
}

/// Clamp a scene pan offset (container pixels).
pub fn clamp_pan(candidate: Point, scene: Size, scale: ParentScale) -> Point {
    clamp_bounds(candidate, scene, Point::ORIGIN, scene, scale)
}

/// Clamp a shape's top-left corner so the shape stays inside the scene (scene pixels).
///
/// Unlike the raw bound, the result also satisfies `x + width <= scene.width`
/// exactly in `f32` whenever the shape fits.
pub fn clamp_shape(candidate: Point, shape: Size, scene: Size) -> Point {
    let pos = clamp_bounds(candidate, shape, Point::ORIGIN, scene, ParentScale::identity());
    Point::new(
        settle_sum(pos.x, shape.width, scene.width),
        settle_sum(pos.y, shape.height, scene.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_unzoomed_pan_is_pinned_at_origin() {
        let scene = Size::new(1000.0, 800.0);
        let scale = ParentScale::new(0.5, 1.0);
        let (x, y) = pan_bounds(scene, scale);
        assert_eq!((x.min, x.max), (0.0, 0.0));
        assert_eq!((y.min, y.max), (0.0, 0.0));
        assert_eq!(clamp_pan(Point::new(-40.0, 25.0), scene, scale), Point::ORIGIN);
    }

    #[test]
    fn test_zoomed_pan_min_matches_overflow() {
        let scene = Size::new(1000.0, 800.0);
        let scale = ParentScale::new(0.5, 2.0);
        let (x, y) = pan_bounds(scene, scale);
        // parent_size * (1 - zoom) * fit
        assert!(approx_eq(x.min, 1000.0 * (1.0 - 2.0) * 0.5));
        assert!(approx_eq(y.min, 800.0 * (1.0 - 2.0) * 0.5));
        assert_eq!(x.max, 0.0);
        assert_eq!(y.max, 0.0);
    }

    #[test]
    fn test_zoomed_pan_clamps_both_sides() {
        let scene = Size::new(1000.0, 800.0);
        let scale = ParentScale::new(0.5, 2.0);
        assert_eq!(
            clamp_pan(Point::new(10.0, -1000.0), scene, scale),
            Point::new(0.0, -400.0)
        );
        assert_eq!(
            clamp_pan(Point::new(-120.0, -30.0), scene, scale),
            Point::new(-120.0, -30.0)
        );
    }

    #[test]
    fn test_shape_stays_inside_scene() {
        let scene = Size::new(1000.0, 800.0);
        let shape = Size::new(200.0, 100.0);
        assert_eq!(
            clamp_shape(Point::new(2000.0, 2000.0), shape, scene),
            Point::new(800.0, 700.0)
        );
        assert_eq!(
            clamp_shape(Point::new(-5.0, 50.0), shape, scene),
            Point::new(0.0, 50.0)
        );
    }

    #[test]
    fn test_parent_position_offsets_bounds() {
        let pos = clamp_bounds(
            Point::new(0.0, 0.0),
            Size::new(10.0, 10.0),
            Point::new(20.0, 30.0),
            Size::new(50.0, 50.0),
            ParentScale::identity(),
        );
        assert_eq!(pos, Point::new(20.0, 30.0));
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let scene = Size::new(640.0, 480.0);
        for zoom in [1.0_f32, 1.01, 1.5, 3.0, 10.0] {
            let scale = ParentScale::new(0.75, zoom);
            for step in -20..=20 {
                let candidate = Point::new(step as f32 * 37.0, step as f32 * -23.0);
                let once = clamp_pan(candidate, scene, scale);
                let twice = clamp_pan(once, scene, scale);
                assert_eq!(once, twice, "zoom {zoom}, candidate {candidate:?}");
            }
        }
    }

    #[test]
    fn test_far_edge_fits_exactly() {
        let scene = Size::new(1000.0, 800.0);
        for step in 1..2000 {
            let shape = Size::new(step as f32 * 0.37, step as f32 * 0.29);
            let pos = clamp_shape(Point::new(5000.0, 5000.0), shape, scene);
            assert!(pos.x + shape.width <= scene.width, "{shape:?} at {pos:?}");
            assert!(pos.y + shape.height <= scene.height, "{shape:?} at {pos:?}");
            assert!(pos.x >= 0.0 && pos.y >= 0.0);
        }
    }

    #[test]
    fn test_legal_position_unchanged() {
        let scene = Size::new(1000.0, 800.0);
        let shape = Size::new(100.0, 100.0);
        let legal = Point::new(450.0, 320.0);
        assert_eq!(clamp_shape(legal, shape, scene), legal);
    }

    #[test]
    fn test_oversized_child_covers_parent() {
        // Child wider than parent: origin may only move left, never expose the right edge
        let bounds = AxisBounds::new(0.0, 100.0, 150.0);
        assert_eq!(bounds.min, -50.0);
        assert_eq!(bounds.max, 0.0);
        assert!(bounds.contains(-25.0));
        assert!(!bounds.contains(1.0));
    }

    #[test]
    fn test_nan_candidate_resolves_to_bound() {
        let bounds = AxisBounds::new(0.0, 100.0, 10.0);
        let clamped = bounds.clamp(f32::NAN);
        assert!(bounds.contains(clamped));
    }
}
