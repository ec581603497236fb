//! Snip box data model.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Unique identifier for a snip box.
///
/// Ids are never reused within an editor, not even across image loads, so a
/// late OCR result can never land on a box it was not requested for.
pub type BoxId = u64;

/// Progress of text recognition for a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrStatus {
    /// No recognition requested yet
    #[default]
    Idle,
    /// Crop handed to the OCR engine, waiting for text
    Processing,
    /// Text received
    Done,
}

/// A rectangular region of the scene whose pixels are sent to OCR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnipBox {
    /// Unique, immutable identifier.
    pub id: BoxId,
    /// Committed geometry in scene pixels.
    pub rect: Rect,
    /// Recognized text, empty until OCR answers.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub ocr_status: OcrStatus,
}

impl SnipBox {
    pub fn new(id: BoxId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            text: String::new(),
            ocr_status: OcrStatus::Idle,
        }
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.rect.contains(point)
    }
}
