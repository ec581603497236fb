//! Scripted editing sessions.
//!
//! A session script is a JSON file describing an image and a sequence of
//! user interactions. Replaying it drives a [`SnipEditor`] exactly as a UI
//! would, which makes interaction bugs reproducible without a renderer.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "scene": { "width": 1000, "height": 800 },
//!   "container_width": 500.0,
//!   "steps": [
//!     { "op": "create_box" },
//!     { "op": "drag_box", "id": 1, "x": 2000.0, "y": 2000.0 },
//!     { "op": "commit_drag", "id": 1 },
//!     { "op": "wheel", "x": 250.0, "y": 200.0, "delta_y": -1.0 }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::editor::SnipEditor;
use crate::geometry::{Point, Rect, SceneDimensions};
use crate::interaction::ViewportEvent;
use crate::snip_box::BoxId;
use crate::viewport::WheelDelta;

/// Current session script format version.
pub const SESSION_VERSION: u32 = 1;

/// One user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SessionStep {
    /// Replace the image
    LoadImage {
        width: u32,
        height: u32,
        container_width: f32,
    },
    /// Container laid out at a new width
    Resize { width: f32 },
    /// Wheel tick at a container position
    Wheel {
        x: f32,
        y: f32,
        delta_y: f32,
        #[serde(default)]
        ctrl: bool,
    },
    /// Background pan drag
    DragStart { x: f32, y: f32 },
    DragMove { x: f32, y: f32 },
    DragEnd,
    /// Click at a container position
    Click { x: f32, y: f32 },
    CreateBox,
    SelectBox { id: Option<BoxId> },
    /// Live box drag to a scene position
    DragBox { id: BoxId, x: f32, y: f32 },
    CommitDrag { id: BoxId },
    /// Live resize keeping the top-left corner
    ResizeBox { id: BoxId, width: f32, height: f32 },
    /// Live transform to an arbitrary proposed rectangle
    TransformBox { id: BoxId, rect: Rect },
    CommitResize { id: BoxId },
    DeleteBox { id: BoxId },
    BeginOcr { id: BoxId },
    /// Recognized text arriving for a box
    SetText { id: BoxId, text: String },
    ResetView,
}

impl SessionStep {
    /// Apply this step to an editor.
    pub fn apply(&self, editor: &mut SnipEditor) {
        match self {
            SessionStep::LoadImage {
                width,
                height,
                container_width,
            } => editor.load_image(SceneDimensions::new(*width, *height), *container_width),
            SessionStep::Resize { width } => {
                editor.handle_viewport_event(ViewportEvent::ContainerResized { width: *width });
            }
            SessionStep::Wheel {
                x,
                y,
                delta_y,
                ctrl,
            } => {
                editor.handle_viewport_event(ViewportEvent::Wheel {
                    pointer: Point::new(*x, *y),
                    delta: WheelDelta::new(*delta_y, *ctrl),
                });
            }
            SessionStep::DragStart { x, y } => {
                editor.handle_viewport_event(ViewportEvent::DragStart(Point::new(*x, *y)));
            }
            SessionStep::DragMove { x, y } => {
                editor.handle_viewport_event(ViewportEvent::DragMove(Point::new(*x, *y)));
            }
            SessionStep::DragEnd => {
                editor.handle_viewport_event(ViewportEvent::DragEnd);
            }
            SessionStep::Click { x, y } => {
                editor.click(Point::new(*x, *y));
            }
            SessionStep::CreateBox => {
                editor.create_box();
            }
            SessionStep::SelectBox { id } => {
                editor.select_box(*id);
            }
            SessionStep::DragBox { id, x, y } => {
                editor.drag_box(*id, Point::new(*x, *y));
            }
            SessionStep::CommitDrag { id } => {
                editor.commit_drag(*id);
            }
            SessionStep::ResizeBox { id, width, height } => {
                editor.resize_box(*id, *width, *height);
            }
            SessionStep::TransformBox { id, rect } => {
                editor.transform_box(*id, *rect);
            }
            SessionStep::CommitResize { id } => {
                editor.commit_resize(*id);
            }
            SessionStep::DeleteBox { id } => {
                editor.delete_box(*id);
            }
            SessionStep::BeginOcr { id } => {
                if let Some(request) = editor.begin_ocr(*id) {
                    log::debug!("OCR requested for box {} over {:?}", request.box_id, request.crop);
                }
            }
            SessionStep::SetText { id, text } => {
                editor.set_box_text(*id, text.clone());
            }
            SessionStep::ResetView => editor.reset_view(),
        }
    }
}

fn default_version() -> u32 {
    SESSION_VERSION
}

/// An image plus the interactions to replay on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    /// Format version for forward compatibility
    #[serde(default = "default_version")]
    pub version: u32,
    /// Natural size of the initial image
    pub scene: SceneDimensions,
    /// Initial container width in screen pixels
    pub container_width: f32,
    #[serde(default)]
    pub steps: Vec<SessionStep>,
}

impl SessionScript {
    pub fn new(scene: SceneDimensions, container_width: f32) -> Self {
        Self {
            version: SESSION_VERSION,
            scene,
            container_width,
            steps: Vec::new(),
        }
    }

    /// Serialize the script to JSON.
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a script from JSON.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let script: Self = serde_json::from_str(json)?;
        if script.version > SESSION_VERSION {
            return Err(SessionError::VersionTooNew {
                file_version: script.version,
                supported_version: SESSION_VERSION,
            });
        }
        Ok(script)
    }

    /// Load a script from a file.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path)?;
        let script = Self::from_json(&json)?;
        log::info!("Loaded session with {} steps from {:?}", script.steps.len(), path);
        Ok(script)
    }

    /// Build a fresh editor and run every step against it.
    pub fn replay(&self, config: EditorConfig) -> SnipEditor {
        let mut editor = SnipEditor::new(config, self.scene, self.container_width);
        for (index, step) in self.steps.iter().enumerate() {
            log::trace!("Step {index}: {step:?}");
            step.apply(&mut editor);
        }
        log::info!(
            "Replayed {} steps, {} boxes remain",
            self.steps.len(),
            editor.boxes().len()
        );
        editor
    }
}

/// Errors that can occur when loading a session script.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// JSON parsing error
    #[error("Failed to parse session script: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Script version is newer than supported
    #[error("Session script version {file_version} is newer than supported {supported_version}")]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing a script
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "version": 1,
        "scene": { "width": 1000, "height": 800 },
        "container_width": 500.0,
        "steps": [
            { "op": "create_box" },
            { "op": "select_box", "id": 1 },
            { "op": "drag_box", "id": 1, "x": 2000.0, "y": 2000.0 },
            { "op": "commit_drag", "id": 1 },
            { "op": "create_box" },
            { "op": "begin_ocr", "id": 2 },
            { "op": "set_text", "id": 2, "text": "total: 42" },
            { "op": "wheel", "x": 250.0, "y": 200.0, "delta_y": -1.0 }
        ]
    }"#;

    #[test]
    fn test_parse_steps() {
        let script = SessionScript::from_json(SCRIPT).expect("parse");
        assert_eq!(script.scene, SceneDimensions::new(1000, 800));
        assert_eq!(script.steps.len(), 8);
        assert_eq!(script.steps[0], SessionStep::CreateBox);
        assert_eq!(
            script.steps[7],
            SessionStep::Wheel {
                x: 250.0,
                y: 200.0,
                delta_y: -1.0,
                ctrl: false
            }
        );
    }

    #[test]
    fn test_replay() {
        let script = SessionScript::from_json(SCRIPT).expect("parse");
        let editor = script.replay(EditorConfig::default());

        let snapshot = editor.snapshot();
        assert_eq!(snapshot.selected, Some(1));
        assert_eq!(snapshot.boxes.len(), 2);
        assert_eq!(snapshot.boxes[0].rect, Rect::new(500.0, 600.0, 500.0, 200.0));
        assert_eq!(snapshot.boxes[1].text, "total: 42");
        assert!(snapshot.viewport.zoom_factor() > 1.0);
    }

    #[test]
    fn test_steps_on_missing_boxes_are_ignored() {
        let mut script = SessionScript::new(SceneDimensions::new(200, 100), 200.0);
        script.steps = vec![
            SessionStep::DeleteBox { id: 9 },
            SessionStep::CommitDrag { id: 9 },
            SessionStep::SetText {
                id: 9,
                text: "late".to_string(),
            },
            SessionStep::SelectBox { id: Some(9) },
        ];
        let editor = script.replay(EditorConfig::default());
        assert!(editor.boxes().is_empty());
        assert_eq!(editor.boxes().selected(), None);
    }

    #[test]
    fn test_version_too_new() {
        let json = r#"{
            "version": 5,
            "scene": { "width": 1, "height": 1 },
            "container_width": 1.0
        }"#;
        assert!(matches!(
            SessionScript::from_json(json),
            Err(SessionError::VersionTooNew { file_version: 5, .. })
        ));
    }

    #[test]
    fn test_unknown_op_rejected() {
        let json = r#"{ "scene": { "width": 1, "height": 1 }, "container_width": 1.0,
                        "steps": [ { "op": "explode" } ] }"#;
        assert!(matches!(
            SessionScript::from_json(json),
            Err(SessionError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        let mut script = SessionScript::new(SceneDimensions::new(640, 480), 320.0);
        script.steps.push(SessionStep::CreateBox);
        script.steps.push(SessionStep::ResetView);
        std::fs::write(&path, script.to_json().expect("serialize")).expect("write");

        assert_eq!(SessionScript::load(&path).expect("load"), script);
        assert!(matches!(
            SessionScript::load(&dir.path().join("missing.json")),
            Err(SessionError::IoError(_))
        ));
    }
}
