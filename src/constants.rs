//! Global constants for the snip-box editor

/// Zoom multiplier applied per wheel tick
pub const ZOOM_STEP: f32 = 1.01;

/// Smallest accepted zoom step (keeps ticks larger than the snap window)
pub const MIN_ZOOM_STEP: f32 = 1.001;

/// Lower bound for the user zoom factor
pub const MIN_ZOOM_FACTOR: f32 = 1.0;

/// Upper bound for the user zoom factor
pub const MAX_ZOOM_FACTOR: f32 = 100.0;

/// Zoom results this close to the floor land exactly on it
pub const ZOOM_SNAP_EPSILON: f32 = 1e-4;

/// Minimum snip box width/height in scene pixels
pub const MIN_BOX_SIZE: f32 = 5.0;

/// New box width as a fraction of the visible scene width
pub const DEFAULT_BOX_WIDTH_FRACTION: f32 = 0.5;

/// New box height as a fraction of the visible scene height
pub const DEFAULT_BOX_HEIGHT_FRACTION: f32 = 0.25;

/// Pan drag moves smaller than this (in container pixels) are dropped
pub const PAN_CHANGE_THRESHOLD: f32 = 0.01;
