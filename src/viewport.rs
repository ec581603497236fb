//! Viewport transform state: fit scale, user zoom and pan.
//!
//! The scene is rendered at `fit_scale * zoom_factor` and translated by the
//! pan offset (container pixels). Every mutation routes the pan through
//! [`clamp_pan`], so the offset never refers to a stale scale and the scene
//! always covers the container.

use serde::{Deserialize, Serialize};

use crate::clamp::{ParentScale, clamp_pan};
use crate::constants::{MIN_ZOOM_FACTOR, MIN_ZOOM_STEP, ZOOM_SNAP_EPSILON};
use crate::geometry::{Point, Rect, SceneDimensions, Size};

/// Zoom direction for a single wheel tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Normalized wheel input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    /// Vertical scroll amount; negative is scroll-up
    pub delta_y: f32,
    /// Zoom modifier (ctrl) held, set by trackpad pinch gestures
    pub ctrl_held: bool,
}

impl WheelDelta {
    pub fn new(delta_y: f32, ctrl_held: bool) -> Self {
        Self { delta_y, ctrl_held }
    }
}

/// Which scroll direction zooms in when no modifier is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelConvention {
    /// Scroll-up (negative delta) zooms in
    #[default]
    ScrollUpZoomsIn,
    /// Scroll-down (positive delta) zooms in
    ScrollDownZoomsIn,
}

impl WheelConvention {
    /// Resolve a wheel event to a zoom direction.
    ///
    /// The modifier inverts the direction (pinch-to-zoom convention). A zero
    /// or non-finite delta carries no direction.
    pub fn direction(&self, wheel: WheelDelta) -> Option<ZoomDirection> {
        if wheel.delta_y == 0.0 || !wheel.delta_y.is_finite() {
            return None;
        }
        let scroll_down = wheel.delta_y > 0.0;
        let zoom_in = match self {
            WheelConvention::ScrollUpZoomsIn => !scroll_down,
            WheelConvention::ScrollDownZoomsIn => scroll_down,
        };
        let zoom_in = zoom_in != wheel.ctrl_held;
        Some(if zoom_in {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        })
    }
}

/// Result of a container resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Fit scale recomputed and pan re-clamped
    Applied,
    /// Container (or scene) has no usable width yet; nothing changed
    Deferred,
}

/// Result of a zoom request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomOutcome {
    /// Zoom factor and pan updated
    Zoomed,
    /// Would have taken the zoom factor below 1; nothing changed
    BelowFloor,
    /// Already at the zoom ceiling; nothing changed
    AtCeiling,
    /// Input carried no usable zoom; nothing changed
    Ignored,
}

/// Pan/zoom state of the scene inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportState {
    scene: Size,
    container_width: f32,
    container_height: f32,
    pan_x: f32,
    pan_y: f32,
    fit_scale: f32,
    zoom_factor: f32,
}

impl ViewportState {
    /// Fresh viewport for a newly loaded scene.
    ///
    /// Until a container width is observed the scene renders at its natural
    /// size (`fit_scale = 1`).
    pub fn new(scene: SceneDimensions) -> Self {
        let scene = scene.size();
        Self {
            scene,
            container_width: scene.width,
            container_height: scene.height,
            pan_x: 0.0,
            pan_y: 0.0,
            fit_scale: 1.0,
            zoom_factor: 1.0,
        }
    }

    /// Fresh viewport already fitted to a container.
    pub fn with_container(scene: SceneDimensions, container_width: f32) -> Self {
        let mut viewport = Self::new(scene);
        viewport.resize(container_width);
        viewport
    }

    pub fn scene_size(&self) -> Size {
        self.scene
    }

    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    pub fn fit_scale(&self) -> f32 {
        self.fit_scale
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    /// `fit_scale * zoom_factor`, the actual render scale.
    pub fn effective_scale(&self) -> f32 {
        self.fit_scale * self.zoom_factor
    }

    pub fn scale(&self) -> ParentScale {
        ParentScale::new(self.fit_scale, self.zoom_factor)
    }

    /// Container size in screen pixels. Its height follows the fitted scene.
    pub fn container_size(&self) -> Size {
        Size::new(self.container_width, self.container_height)
    }

    /// Size of the rendered stage at fit scale (`scene * fit_scale`).
    pub fn render_size(&self) -> Size {
        self.scene.scaled(self.fit_scale)
    }

    /// Size of the scene on screen after zoom.
    pub fn scaled_scene_size(&self) -> Size {
        self.scene.scaled(self.effective_scale())
    }

    // ========================================================================
    // Coordinate conversion
    // ========================================================================

    /// Container point to scene point.
    pub fn screen_to_scene(&self, point: Point) -> Point {
        let scale = self.effective_scale();
        Point::new((point.x - self.pan_x) / scale, (point.y - self.pan_y) / scale)
    }

    /// Scene point to container point.
    pub fn scene_to_screen(&self, point: Point) -> Point {
        let scale = self.effective_scale();
        Point::new(point.x * scale + self.pan_x, point.y * scale + self.pan_y)
    }

    /// The part of the scene currently visible in the container, in scene pixels.
    pub fn visible_scene_rect(&self) -> Rect {
        let origin = self.screen_to_scene(Point::ORIGIN);
        let size = self.container_size().scaled(1.0 / self.effective_scale());
        Rect::from_origin_size(origin, size)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Recompute the fit scale for a new container width and re-clamp the pan.
    ///
    /// A zero, negative or non-finite width means the container is not laid
    /// out yet; the resize is deferred until a usable width arrives.
    pub fn resize(&mut self, container_width: f32) -> ResizeOutcome {
        if !container_width.is_finite() || container_width <= 0.0 || self.scene.width <= 0.0 {
            log::debug!("Resize deferred: container width {container_width}");
            return ResizeOutcome::Deferred;
        }

        self.fit_scale = container_width / self.scene.width;
        self.container_width = container_width;
        self.container_height = self.scene.height * self.fit_scale;
        self.set_pan_clamped(self.pan());
        log::debug!(
            "Resized container to {:.1}x{:.1}, fit scale {:.4}",
            self.container_width,
            self.container_height,
            self.fit_scale
        );
        ResizeOutcome::Applied
    }

    /// Zoom by one wheel tick, keeping the scene point under `pointer` fixed.
    pub fn apply_zoom(
        &mut self,
        pointer: Point,
        wheel: WheelDelta,
        convention: WheelConvention,
        step: f32,
        max_zoom: f32,
    ) -> ZoomOutcome {
        match convention.direction(wheel) {
            Some(direction) => self.zoom_at(pointer, direction, step, max_zoom),
            None => ZoomOutcome::Ignored,
        }
    }

    /// Multiply or divide the effective scale by `step`, anchored at `pointer`.
    ///
    /// Rejected without any state change if the zoom factor would drop below 1.
    /// Zooming in stops at `max_zoom`.
    pub fn zoom_at(
        &mut self,
        pointer: Point,
        direction: ZoomDirection,
        step: f32,
        max_zoom: f32,
    ) -> ZoomOutcome {
        if !step.is_finite() || step < MIN_ZOOM_STEP {
            log::warn!("Ignoring zoom with invalid step {step}");
            return ZoomOutcome::Ignored;
        }
        if !max_zoom.is_finite() || max_zoom < MIN_ZOOM_FACTOR {
            log::warn!("Ignoring zoom with invalid ceiling {max_zoom}");
            return ZoomOutcome::Ignored;
        }

        let old_scale = self.effective_scale();
        let new_scale = match direction {
            ZoomDirection::In => old_scale * step,
            ZoomDirection::Out => old_scale / step,
        };
        let mut new_zoom = new_scale / self.fit_scale;
        if (new_zoom - MIN_ZOOM_FACTOR).abs() < ZOOM_SNAP_EPSILON {
            new_zoom = MIN_ZOOM_FACTOR;
        }
        if new_zoom.is_nan() || new_zoom < MIN_ZOOM_FACTOR {
            log::trace!("Zoom rejected: factor {new_zoom:.4} below floor");
            return ZoomOutcome::BelowFloor;
        }
        new_zoom = new_zoom.min(max_zoom);
        if new_zoom <= self.zoom_factor && direction == ZoomDirection::In {
            log::trace!("Zoom rejected: already at ceiling {max_zoom:.2}");
            return ZoomOutcome::AtCeiling;
        }

        // Scene point under the pointer before zoom, placed back under it after
        let anchor = self.screen_to_scene(pointer);
        let new_scale = self.fit_scale * new_zoom;
        let candidate = Point::new(
            pointer.x - anchor.x * new_scale,
            pointer.y - anchor.y * new_scale,
        );

        self.zoom_factor = new_zoom;
        self.set_pan_clamped(candidate);
        log::debug!(
            "Zoom {:.3}x at ({:.1}, {:.1}), pan ({:.1}, {:.1})",
            self.zoom_factor,
            pointer.x,
            pointer.y,
            self.pan_x,
            self.pan_y
        );
        ZoomOutcome::Zoomed
    }

    /// Where the scene may be placed for a candidate pan, without changing state.
    ///
    /// This is the drag-bound function: renderers feed live drag positions
    /// through it so content never leaves its legal region, even transiently.
    pub fn pan_bound(&self, candidate: Point) -> Point {
        clamp_pan(candidate, self.scene, self.scale())
    }

    /// Replace the pan offset with the clamped candidate and return the accepted value.
    pub fn apply_pan(&mut self, candidate: Point) -> Point {
        self.set_pan_clamped(candidate);
        self.pan()
    }

    /// Back to zoom 1 with the scene pinned at the container origin.
    pub fn reset_view(&mut self) {
        self.zoom_factor = MIN_ZOOM_FACTOR;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        log::debug!("View reset");
    }

    fn set_pan_clamped(&mut self, candidate: Point) {
        let pan = self.pan_bound(candidate);
        self.pan_x = pan.x;
        self.pan_y = pan.y;
    }
}
