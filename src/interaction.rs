//! Viewport interaction controller.
//!
//! Turns normalized wheel, drag and resize events into viewport updates.
//! The controller never touches snip boxes.

use crate::config::EditorConfig;
use crate::constants::{MAX_ZOOM_FACTOR, PAN_CHANGE_THRESHOLD, ZOOM_STEP};
use crate::geometry::Point;
use crate::viewport::{ResizeOutcome, ViewportState, WheelConvention, WheelDelta, ZoomOutcome};

/// Normalized input for the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    /// Wheel or trackpad scroll at a container position
    Wheel { pointer: Point, delta: WheelDelta },
    /// Background drag started at a container position
    DragStart(Point),
    /// Background drag moved to a container position
    DragMove(Point),
    /// Background drag released
    DragEnd,
    /// Container laid out with a new width
    ContainerResized { width: f32 },
}

/// Transient state of a background pan drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanDragState {
    /// Pointer position and pan offset when the drag started
    anchor: Option<(Point, Point)>,
    /// Last pointer position that moved the pan
    last_pointer: Option<Point>,
}

impl PanDragState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag operation.
    pub fn start_drag(&mut self, pointer: Point, pan: Point) {
        self.anchor = Some((pointer, pan));
        self.last_pointer = Some(pointer);
    }

    /// Candidate pan for a new pointer position, or `None` if no drag is
    /// active or the pointer has not meaningfully moved.
    ///
    /// The candidate is measured from the drag start, so content held at a
    /// bound only comes back once the pointer returns past the bound.
    pub fn update_drag(&mut self, pointer: Point) -> Option<Point> {
        let (start_pointer, start_pan) = self.anchor?;
        let last = self.last_pointer.unwrap_or(start_pointer);
        if (pointer.x - last.x).abs() <= PAN_CHANGE_THRESHOLD
            && (pointer.y - last.y).abs() <= PAN_CHANGE_THRESHOLD
        {
            return None;
        }
        self.last_pointer = Some(pointer);
        Some(start_pan.offset(pointer.x - start_pointer.x, pointer.y - start_pointer.y))
    }

    /// End the drag operation.
    pub fn end_drag(&mut self) {
        self.anchor = None;
        self.last_pointer = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Routes viewport events to [`ViewportState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportController {
    convention: WheelConvention,
    zoom_step: f32,
    max_zoom: f32,
    drag: PanDragState,
}

impl ViewportController {
    pub fn new(convention: WheelConvention, zoom_step: f32) -> Self {
        Self {
            convention,
            zoom_step,
            max_zoom: MAX_ZOOM_FACTOR,
            drag: PanDragState::new(),
        }
    }

    /// Replace the zoom ceiling.
    pub fn with_max_zoom(mut self, max_zoom: f32) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.wheel_convention, config.zoom_step).with_max_zoom(config.max_zoom_factor)
    }

    pub fn convention(&self) -> WheelConvention {
        self.convention
    }

    pub fn is_panning(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Drop any in-progress pan drag.
    pub fn cancel(&mut self) {
        self.drag.end_drag();
    }

    /// Apply one event. Returns `true` if the viewport changed.
    pub fn handle(&mut self, viewport: &mut ViewportState, event: ViewportEvent) -> bool {
        match event {
            ViewportEvent::Wheel { pointer, delta } => {
                let outcome = viewport.apply_zoom(
                    pointer,
                    delta,
                    self.convention,
                    self.zoom_step,
                    self.max_zoom,
                );
                if self.drag.is_dragging() && outcome == ZoomOutcome::Zoomed {
                    // Rebase the drag on the new scale so the next move does not jump
                    self.drag.start_drag(pointer, viewport.pan());
                }
                outcome == ZoomOutcome::Zoomed
            }
            ViewportEvent::DragStart(pointer) => {
                if self.drag.is_dragging() {
                    log::warn!("Starting new pan drag while previous drag still active");
                }
                self.drag.start_drag(pointer, viewport.pan());
                log::debug!("Pan drag started at ({:.1}, {:.1})", pointer.x, pointer.y);
                false
            }
            ViewportEvent::DragMove(pointer) => match self.drag.update_drag(pointer) {
                Some(candidate) => {
                    let before = viewport.pan();
                    let pan = viewport.apply_pan(candidate);
                    log::trace!("Panning to ({:.1}, {:.1})", pan.x, pan.y);
                    pan != before
                }
                None => false,
            },
            ViewportEvent::DragEnd => {
                if self.drag.is_dragging() {
                    log::debug!("Pan drag ended");
                }
                self.drag.end_drag();
                false
            }
            ViewportEvent::ContainerResized { width } => {
                viewport.resize(width) == ResizeOutcome::Applied
            }
        }
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(WheelConvention::default(), ZOOM_STEP)
    }
}
