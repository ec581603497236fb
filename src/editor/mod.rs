//! The snip editor: one loaded image, its viewport and its snip boxes.
//!
//! `SnipEditor` is what a UI layer talks to. It owns the viewport state and
//! controller plus the box manager, and exposes the renderer-facing output as
//! an [`EditorSnapshot`].

use serde::Serialize;

use crate::box_manager::{BoxManager, EditState, TransformOutcome};
use crate::config::EditorConfig;
use crate::geometry::{Point, Rect, SceneDimensions};
use crate::interaction::{ViewportController, ViewportEvent};
use crate::ocr::OcrRequest;
use crate::snip_box::{BoxId, SnipBox};
use crate::viewport::ViewportState;

#[cfg(test)]
mod tests;

/// Everything a renderer needs to draw the current frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorSnapshot {
    pub scene: SceneDimensions,
    pub viewport: ViewportState,
    /// Committed boxes in creation (draw) order
    pub boxes: Vec<SnipBox>,
    /// Box showing resize handles
    pub selected: Option<BoxId>,
    /// Boxes or selection changed since the last [`SnipEditor::mark_rendered`]
    pub boxes_changed: bool,
}

/// Viewport and snip boxes for the currently loaded image.
#[derive(Debug, Clone)]
pub struct SnipEditor {
    config: EditorConfig,
    scene: SceneDimensions,
    viewport: ViewportState,
    controller: ViewportController,
    boxes: BoxManager,
}

impl SnipEditor {
    /// Create an editor showing `scene` in a container `container_width` pixels wide.
    pub fn new(config: EditorConfig, scene: SceneDimensions, container_width: f32) -> Self {
        let controller = ViewportController::from_config(&config);
        let boxes = BoxManager::new(scene, config.min_box_size);
        log::info!(
            "Loaded {}x{} image into {container_width:.0}px container",
            scene.width,
            scene.height
        );
        Self {
            scene,
            viewport: ViewportState::with_container(scene, container_width),
            controller,
            boxes,
            config,
        }
    }

    /// Replace the image. Viewport, boxes, selection and edits all reset.
    pub fn load_image(&mut self, scene: SceneDimensions, container_width: f32) {
        self.scene = scene;
        self.viewport = ViewportState::with_container(scene, container_width);
        self.controller.cancel();
        self.boxes.reset(scene);
        log::info!(
            "Loaded {}x{} image into {container_width:.0}px container",
            scene.width,
            scene.height
        );
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> SceneDimensions {
        self.scene
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn boxes(&self) -> &BoxManager {
        &self.boxes
    }

    pub fn is_panning(&self) -> bool {
        self.controller.is_panning()
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    /// Route a wheel, background drag or resize event. Returns `true` if the view changed.
    pub fn handle_viewport_event(&mut self, event: ViewportEvent) -> bool {
        self.controller.handle(&mut self.viewport, event)
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
    }

    /// Click at a container position: select the topmost box under it, or
    /// clear the selection when the background was hit.
    pub fn click(&mut self, pointer: Point) -> Option<BoxId> {
        let scene_point = self.viewport.screen_to_scene(pointer);
        let hit = self.boxes.hit_test(&scene_point);
        self.boxes.select_box(hit);
        hit
    }

    // ========================================================================
    // Boxes
    // ========================================================================

    /// Add a box at the top-left of the visible part of the scene.
    pub fn create_box(&mut self) -> BoxId {
        let visible = self.viewport.visible_scene_rect();
        self.boxes.create_box(
            visible,
            self.config.default_box_width_fraction,
            self.config.default_box_height_fraction,
        )
    }

    pub fn select_box(&mut self, id: Option<BoxId>) -> bool {
        self.boxes.select_box(id)
    }

    pub fn delete_box(&mut self, id: BoxId) -> Option<SnipBox> {
        self.boxes.delete_box(id)
    }

    /// Live drag of a box to a scene position.
    pub fn drag_box(&mut self, id: BoxId, candidate: Point) -> Option<Point> {
        self.boxes.drag_box(id, candidate)
    }

    pub fn commit_drag(&mut self, id: BoxId) -> Option<Rect> {
        self.boxes.commit_drag(id)
    }

    pub fn resize_box(&mut self, id: BoxId, width: f32, height: f32) -> Option<TransformOutcome> {
        self.boxes.resize_box(id, width, height)
    }

    pub fn transform_box(&mut self, id: BoxId, proposed: Rect) -> Option<TransformOutcome> {
        self.boxes.transform_box(id, proposed)
    }

    pub fn commit_resize(&mut self, id: BoxId) -> Option<Rect> {
        self.boxes.commit_resize(id)
    }

    pub fn edit_state(&self) -> EditState {
        self.boxes.edit_state()
    }

    pub fn begin_ocr(&mut self, id: BoxId) -> Option<OcrRequest> {
        self.boxes.begin_ocr(id)
    }

    /// OCR callback. Silently dropped if the box is gone.
    pub fn set_box_text(&mut self, id: BoxId, text: impl Into<String>) -> bool {
        self.boxes.set_box_text(id, text)
    }

    // ========================================================================
    // Output
    // ========================================================================

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            scene: self.scene,
            viewport: self.viewport,
            boxes: self.boxes.iter().cloned().collect(),
            selected: self.boxes.selected(),
            boxes_changed: self.boxes.is_dirty(),
        }
    }

    /// Acknowledge that the current boxes have been drawn.
    pub fn mark_rendered(&mut self) {
        self.boxes.clear_dirty();
    }
}
