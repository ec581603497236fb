//! Snip box collection, selection and edit lifecycle.
//!
//! Geometry lives in two places while the user interacts:
//! - committed geometry in the box collection, the only state renderers and
//!   the OCR collaborator read back
//! - live geometry in [`EditState`] while a drag or resize is in progress,
//!   written into the collection only on drag end / transform end
//!
//! At most one box is selected and at most one box is being edited.

use std::collections::BTreeMap;

use crate::clamp::clamp_shape;
use crate::geometry::{Point, Rect, SceneDimensions, Size};
use crate::ocr::OcrRequest;
use crate::snip_box::{BoxId, OcrStatus, SnipBox};

/// In-flight edit of a single box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditState {
    /// No box is being moved or resized.
    #[default]
    Idle,
    /// A box is being dragged; `live` is its clamped on-screen geometry.
    Dragging { id: BoxId, live: Rect },
    /// A box is being resized through a transform handle.
    Resizing { id: BoxId, live: Rect },
}

impl EditState {
    /// The box being edited, if any.
    pub fn box_id(&self) -> Option<BoxId> {
        match self {
            EditState::Idle => None,
            EditState::Dragging { id, .. } | EditState::Resizing { id, .. } => Some(*id),
        }
    }

    /// Live geometry of the box being edited, if any.
    pub fn live_rect(&self) -> Option<Rect> {
        match self {
            EditState::Idle => None,
            EditState::Dragging { live, .. } | EditState::Resizing { live, .. } => Some(*live),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditState::Idle)
    }
}

/// Answer to a resize proposal from a transform handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOutcome {
    /// Proposal accepted; the box shows this geometry until commit.
    Accepted(Rect),
    /// Proposal rejected; the box keeps showing its previous geometry.
    Rejected(Rect),
}

impl TransformOutcome {
    /// Geometry the renderer should show.
    pub fn rect(&self) -> Rect {
        match self {
            TransformOutcome::Accepted(rect) | TransformOutcome::Rejected(rect) => *rect,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, TransformOutcome::Accepted(_))
    }
}

/// Storage for the snip boxes on the current image.
#[derive(Debug, Clone)]
pub struct BoxManager {
    /// All boxes keyed by id; ids grow monotonically so iteration follows creation order.
    boxes: BTreeMap<BoxId, SnipBox>,
    /// Counter for generating unique box ids.
    next_id: BoxId,
    /// Currently selected box id.
    selected: Option<BoxId>,
    /// Drag or resize in progress.
    edit: EditState,
    scene: SceneDimensions,
    min_box_size: f32,
    /// Set when committed boxes or selection change.
    dirty: bool,
}

impl BoxManager {
    pub fn new(scene: SceneDimensions, min_box_size: f32) -> Self {
        Self {
            boxes: BTreeMap::new(),
            next_id: 1,
            selected: None,
            edit: EditState::Idle,
            scene,
            min_box_size,
            dirty: true,
        }
    }

    /// Drop every box for a newly loaded scene. Ids keep counting up.
    pub fn reset(&mut self, scene: SceneDimensions) {
        self.boxes.clear();
        self.selected = None;
        self.edit = EditState::Idle;
        self.scene = scene;
        self.mark_dirty();
    }

    pub fn scene(&self) -> SceneDimensions {
        self.scene
    }

    pub fn min_box_size(&self) -> f32 {
        self.min_box_size
    }

    /// Check if boxes or selection changed since the last `clear_dirty()`.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after re-rendering.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    #[inline]
    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // ========================================================================
    // Collection access
    // ========================================================================

    pub fn get(&self, id: BoxId) -> Option<&SnipBox> {
        self.boxes.get(&id)
    }

    /// All boxes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &SnipBox> {
        self.boxes.values()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Topmost (most recently created) box containing a scene point.
    pub fn hit_test(&self, point: &Point) -> Option<BoxId> {
        self.boxes
            .values()
            .rev()
            .find(|snip| snip.contains(point))
            .map(|snip| snip.id)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Insert a box at the top-left of the visible region, sized as a fraction
    /// of it. The new box is not selected.
    pub fn create_box(
        &mut self,
        visible: Rect,
        width_fraction: f32,
        height_fraction: f32,
    ) -> BoxId {
        let scene = self.scene.size();
        let visible = visible.intersect_bounds(scene);
        let size = Size::new(
            (visible.width * width_fraction)
                .max(self.min_box_size)
                .min(scene.width),
            (visible.height * height_fraction)
                .max(self.min_box_size)
                .min(scene.height),
        );
        let origin = clamp_shape(visible.origin(), size, scene);

        let id = self.next_id;
        self.next_id += 1;
        let rect = Rect::from_origin_size(origin, size);
        self.boxes.insert(id, SnipBox::new(id, rect));
        self.mark_dirty();
        log::debug!(
            "Created box {id} at ({:.1}, {:.1}) size {:.1}x{:.1}",
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
        id
    }

    /// Remove a box. Clears the selection and any edit that referenced it.
    pub fn delete_box(&mut self, id: BoxId) -> Option<SnipBox> {
        let removed = self.boxes.remove(&id);
        if removed.is_some() {
            self.mark_dirty();
            log::debug!("Deleted box {id}");
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.edit.box_id() == Some(id) {
            self.edit = EditState::Idle;
        }
        removed
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Select a box, or clear the selection with `None`.
    ///
    /// Selecting an id that does not exist leaves the selection untouched and
    /// returns `false`.
    pub fn select_box(&mut self, id: Option<BoxId>) -> bool {
        if let Some(id) = id {
            if !self.boxes.contains_key(&id) {
                log::warn!("Ignoring selection of missing box {id}");
                return false;
            }
        }
        if self.selected != id {
            self.selected = id;
            self.mark_dirty();
        }
        true
    }

    pub fn selected(&self) -> Option<BoxId> {
        self.selected
    }

    pub fn selected_box(&self) -> Option<&SnipBox> {
        self.selected.and_then(|id| self.boxes.get(&id))
    }

    // ========================================================================
    // Drag / resize
    // ========================================================================

    pub fn edit_state(&self) -> EditState {
        self.edit
    }

    /// Geometry to draw for a box: live while it is being edited, committed otherwise.
    pub fn display_rect(&self, id: BoxId) -> Option<Rect> {
        let committed = self.boxes.get(&id)?.rect;
        match self.edit {
            EditState::Dragging { id: edited, live } | EditState::Resizing { id: edited, live }
                if edited == id =>
            {
                Some(live)
            }
            _ => Some(committed),
        }
    }

    /// Live drag update. Returns the position the box may actually take,
    /// clamped so it stays inside the scene. Nothing is committed.
    pub fn drag_box(&mut self, id: BoxId, candidate: Point) -> Option<Point> {
        let Some(snip) = self.boxes.get(&id) else {
            log::warn!("Ignoring drag of missing box {id}");
            return None;
        };
        let rect = snip.rect;
        let position = clamp_shape(candidate, rect.size(), self.scene.size());
        self.edit = EditState::Dragging {
            id,
            live: rect.with_origin(position),
        };
        log::trace!("Dragging box {id} to ({:.1}, {:.1})", position.x, position.y);
        Some(position)
    }

    /// Drag end: write the live position into the collection.
    ///
    /// Returns the committed geometry, or `None` if this box was not being dragged.
    pub fn commit_drag(&mut self, id: BoxId) -> Option<Rect> {
        match self.edit {
            EditState::Dragging { id: edited, live } if edited == id => {
                self.edit = EditState::Idle;
                self.commit(id, live)
            }
            _ => None,
        }
    }

    /// Resize through a handle that keeps the top-left corner.
    pub fn resize_box(&mut self, id: BoxId, width: f32, height: f32) -> Option<TransformOutcome> {
        let current = self.display_rect(id)?;
        self.transform_box(id, Rect::new(current.x, current.y, width, height))
    }

    /// Propose new geometry from any transform handle.
    ///
    /// Proposals below the minimum size are rejected and the previous
    /// geometry stays. Accepted proposals are cut to the scene and held as
    /// live geometry until [`commit_resize`](Self::commit_resize).
    pub fn transform_box(&mut self, id: BoxId, proposed: Rect) -> Option<TransformOutcome> {
        let Some(current) = self.display_rect(id) else {
            log::warn!("Ignoring resize of missing box {id}");
            return None;
        };
        if self.below_min_size(proposed.size()) {
            log::trace!(
                "Rejected resize of box {id} to {:.1}x{:.1}",
                proposed.width,
                proposed.height
            );
            return Some(TransformOutcome::Rejected(current));
        }
        let fitted = proposed.intersect_bounds(self.scene.size());
        if self.below_min_size(fitted.size()) {
            return Some(TransformOutcome::Rejected(current));
        }
        self.edit = EditState::Resizing { id, live: fitted };
        Some(TransformOutcome::Accepted(fitted))
    }

    /// Transform end: write the live geometry into the collection.
    pub fn commit_resize(&mut self, id: BoxId) -> Option<Rect> {
        match self.edit {
            EditState::Resizing { id: edited, live } if edited == id => {
                self.edit = EditState::Idle;
                self.commit(id, live)
            }
            _ => None,
        }
    }

    /// Abandon the current drag or resize without committing.
    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Idle;
    }

    fn below_min_size(&self, size: Size) -> bool {
        size.width.is_nan()
            || size.height.is_nan()
            || size.width < self.min_box_size
            || size.height < self.min_box_size
    }

    fn commit(&mut self, id: BoxId, rect: Rect) -> Option<Rect> {
        let snip = self.boxes.get_mut(&id)?;
        snip.rect = rect;
        self.mark_dirty();
        log::debug!(
            "Committed box {id}: ({:.1}, {:.1}) {:.1}x{:.1}",
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
        Some(rect)
    }

    // ========================================================================
    // OCR
    // ========================================================================

    /// Mark a box as processing and describe the region to recognize.
    pub fn begin_ocr(&mut self, id: BoxId) -> Option<OcrRequest> {
        let scene = self.scene;
        let Some(snip) = self.boxes.get_mut(&id) else {
            log::warn!("Ignoring OCR request for missing box {id}");
            return None;
        };
        snip.ocr_status = OcrStatus::Processing;
        let request = OcrRequest::for_box(snip, scene);
        self.mark_dirty();
        Some(request)
    }

    /// Store recognized text. A result for a box that no longer exists is discarded.
    pub fn set_box_text(&mut self, id: BoxId, text: impl Into<String>) -> bool {
        let Some(snip) = self.boxes.get_mut(&id) else {
            log::debug!("Discarding OCR text for missing box {id}");
            return false;
        };
        snip.text = text.into();
        snip.ocr_status = OcrStatus::Done;
        self.mark_dirty();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MIN_BOX_SIZE;

    fn manager() -> BoxManager {
        BoxManager::new(SceneDimensions::new(1000, 800), MIN_BOX_SIZE)
    }

    fn whole_scene() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 800.0)
    }

    #[test]
    fn test_create_box_default_geometry() {
        let mut boxes = manager();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        let snip = boxes.get(id).expect("box exists");
        assert_eq!(snip.rect, Rect::new(0.0, 0.0, 500.0, 200.0));
        assert!(snip.text.is_empty());
        assert_eq!(snip.ocr_status, OcrStatus::Idle);
        assert_eq!(boxes.selected(), None);
    }

    #[test]
    fn test_create_box_at_visible_top_left() {
        let mut boxes = manager();
        let id = boxes.create_box(Rect::new(200.0, 100.0, 400.0, 320.0), 0.5, 0.25);
        assert_eq!(boxes.get(id).map(|b| b.rect), Some(Rect::new(200.0, 100.0, 200.0, 80.0)));
    }

    #[test]
    fn test_ids_unique_and_increasing() {
        let mut boxes = manager();
        let a = boxes.create_box(whole_scene(), 0.5, 0.25);
        let b = boxes.create_box(whole_scene(), 0.5, 0.25);
        assert_ne!(a, b);
        boxes.reset(SceneDimensions::new(10, 10));
        let c = boxes.create_box(Rect::new(0.0, 0.0, 10.0, 10.0), 0.5, 0.5);
        assert!(c > b);
    }

    #[test]
    fn test_selection_exclusive() {
        let mut boxes = manager();
        let a = boxes.create_box(whole_scene(), 0.5, 0.25);
        let b = boxes.create_box(whole_scene(), 0.5, 0.25);
        assert!(boxes.select_box(Some(a)));
        assert!(boxes.select_box(Some(b)));
        assert_eq!(boxes.selected(), Some(b));
        assert!(boxes.select_box(None));
        assert_eq!(boxes.selected(), None);
    }

    #[test]
    fn test_select_missing_box_rejected() {
        let mut boxes = manager();
        let a = boxes.create_box(whole_scene(), 0.5, 0.25);
        boxes.select_box(Some(a));
        assert!(!boxes.select_box(Some(999)));
        assert_eq!(boxes.selected(), Some(a));
    }

    #[test]
    fn test_drag_is_live_until_commit() {
        let mut boxes = manager();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        assert_eq!(boxes.drag_box(id, Point::new(100.0, 50.0)), Some(Point::new(100.0, 50.0)));
        assert_eq!(boxes.get(id).map(|b| b.rect.origin()), Some(Point::ORIGIN));
        assert_eq!(boxes.display_rect(id).map(|r| r.origin()), Some(Point::new(100.0, 50.0)));

        let committed = boxes.commit_drag(id).expect("drag in progress");
        assert_eq!(committed.origin(), Point::new(100.0, 50.0));
        assert_eq!(boxes.get(id).map(|b| b.rect), Some(committed));
        assert!(boxes.edit_state().is_idle());
    }

    #[test]
    fn test_drag_clamped_to_scene() {
        let mut boxes = manager();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        assert_eq!(boxes.drag_box(id, Point::new(2000.0, 2000.0)), Some(Point::new(500.0, 600.0)));
        assert_eq!(boxes.drag_box(id, Point::new(-20.0, 10.0)), Some(Point::new(0.0, 10.0)));
    }

    #[test]
    fn test_commit_without_drag_is_noop() {
        let mut boxes = manager();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        assert_eq!(boxes.commit_drag(id), None);
        assert_eq!(boxes.commit_resize(id), None);
    }

    #[test]
    fn test_resize_below_floor_rejected() {
        let mut boxes = manager();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        let before = boxes.get(id).map(|b| b.rect);
        let outcome = boxes.resize_box(id, 3.0, 3.0).expect("box exists");
        assert!(!outcome.is_accepted());
        assert_eq!(Some(outcome.rect()), before);
        assert_eq!(boxes.commit_resize(id), None);
        assert_eq!(boxes.get(id).map(|b| b.rect), before);
    }

    #[test]
    fn test_resize_at_floor_accepted() {
        let mut boxes = manager();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        let outcome = boxes.resize_box(id, 5.0, 5.0).expect("box exists");
        assert!(outcome.is_accepted());
        assert_eq!(boxes.commit_resize(id), Some(Rect::new(0.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_rejected_proposal_keeps_live_geometry() {
        let mut boxes = manager();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        boxes.resize_box(id, 300.0, 150.0);
        let rejected = boxes.resize_box(id, 2.0, 150.0).expect("box exists");
        assert_eq!(rejected, TransformOutcome::Rejected(Rect::new(0.0, 0.0, 300.0, 150.0)));
        assert_eq!(boxes.commit_resize(id), Some(Rect::new(0.0, 0.0, 300.0, 150.0)));
    }

    #[test]
    fn test_transform_cut_to_scene() {
        let mut boxes = manager();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        let outcome = boxes
            .transform_box(id, Rect::new(900.0, -50.0, 300.0, 150.0))
            .expect("box exists");
        assert_eq!(outcome, TransformOutcome::Accepted(Rect::new(900.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_delete_clears_selection_and_edit() {
        let mut boxes = manager();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        boxes.select_box(Some(id));
        boxes.drag_box(id, Point::new(10.0, 10.0));
        assert!(boxes.delete_box(id).is_some());
        assert_eq!(boxes.selected(), None);
        assert!(boxes.edit_state().is_idle());
        assert_eq!(boxes.commit_drag(id), None);
        assert!(boxes.delete_box(id).is_none());
    }

    #[test]
    fn test_set_text_on_missing_box_is_noop() {
        let mut boxes = manager();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        boxes.delete_box(id);
        assert!(!boxes.set_box_text(id, "late result"));
        assert!(boxes.is_empty());
    }

    #[test]
    fn test_ocr_lifecycle() {
        let mut boxes = manager();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        let request = boxes.begin_ocr(id).expect("box exists");
        assert_eq!(request.box_id, id);
        assert_eq!(boxes.get(id).map(|b| b.ocr_status), Some(OcrStatus::Processing));

        assert!(boxes.set_box_text(id, "hello"));
        let snip = boxes.get(id).expect("box exists");
        assert_eq!(snip.text, "hello");
        assert_eq!(snip.ocr_status, OcrStatus::Done);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut boxes = manager();
        let lower = boxes.create_box(whole_scene(), 0.5, 0.25);
        let upper = boxes.create_box(whole_scene(), 0.25, 0.25);
        assert_eq!(boxes.hit_test(&Point::new(10.0, 10.0)), Some(upper));
        assert_eq!(boxes.hit_test(&Point::new(400.0, 10.0)), Some(lower));
        assert_eq!(boxes.hit_test(&Point::new(900.0, 700.0)), None);
    }

    #[test]
    fn test_dirty_flag() {
        let mut boxes = manager();
        assert!(boxes.is_dirty());
        boxes.clear_dirty();
        let id = boxes.create_box(whole_scene(), 0.5, 0.25);
        assert!(boxes.is_dirty());
        boxes.clear_dirty();
        boxes.drag_box(id, Point::new(5.0, 5.0));
        assert!(!boxes.is_dirty());
        boxes.commit_drag(id);
        assert!(boxes.is_dirty());
    }
}
