//! Snipbox - viewport and snip-box engine for image text extraction
//!
//! Shows one image inside a fixed-width container with wheel zoom and drag
//! pan, and manages rectangular snip boxes drawn over it. Every pan offset
//! and every committed box is kept inside the image.

pub mod box_manager;
pub mod clamp;
pub mod config;
pub mod constants;
pub mod editor;
pub mod geometry;
pub mod interaction;
pub mod ocr;
pub mod session;
pub mod snip_box;
pub mod viewport;

pub use box_manager::{BoxManager, EditState, TransformOutcome};
pub use config::{ConfigError, EditorConfig};
pub use editor::{EditorSnapshot, SnipEditor};
pub use geometry::{PixelRect, Point, Rect, SceneDimensions, Size};
pub use interaction::{ViewportController, ViewportEvent};
pub use snip_box::{BoxId, OcrStatus, SnipBox};
pub use viewport::{ViewportState, WheelConvention, WheelDelta};
