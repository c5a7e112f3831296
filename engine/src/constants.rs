//! Engine-wide constants and configuration values.

/// Default timeline frame rate.
pub const DEFAULT_FPS: f64 = 30.0;

/// Minimum clip duration in seconds.
pub const MIN_DURATION: f64 = 0.1;

/// Maximum clip duration in seconds (30 minutes).
pub const MAX_CLIP_DURATION: f64 = 1800.0;

/// Tolerance for frame-alignment comparisons.
pub const FRAME_EPSILON: f64 = 1e-9;

pub mod scale {
    /// Base scale at zoom level 1.0.
    pub const PIXELS_PER_SECOND: f64 = 100.0;
    pub const MIN_ZOOM: f64 = 0.1;
    pub const MAX_ZOOM: f64 = 10.0;
    pub const DEFAULT_ZOOM: f64 = 1.0;
}

pub mod snapping {
    /// Number of frame snap points generated on each side of the current time.
    pub const FRAME_SNAP_WINDOW: i64 = 5;
    /// Minimum pixels between frame snap points.
    pub const MIN_FRAME_PIXEL_SPACING: f64 = 10.0;
    /// Maximum zoom level at which frame snapping is offered.
    pub const MAX_FRAME_SNAP_ZOOM: f64 = 4.0;
}

pub mod layers {
    /// Maximum number of render layers per track.
    pub const MAX_LAYERS: u32 = 10;
    /// Minimum height for a layer, in pixels.
    pub const MIN_LAYER_HEIGHT: f64 = 60.0;
    /// Pixels between layers.
    pub const LAYER_SPACING: f64 = 2.0;
}

pub mod history {
    /// Maximum number of history entries retained.
    pub const MAX_HISTORY_SIZE: usize = 100;
}

pub mod sync {
    /// Deviation from the ideal frame interval that triggers drift
    /// compensation, in milliseconds.
    pub const DRIFT_THRESHOLD_MS: f64 = 2.0;
    /// Remaining active-clip duration below which the next clip should be
    /// preloaded, in seconds.
    pub const PRELOAD_LOOKAHEAD: f64 = 1.0;
    /// Maximum time adjustment applied per drift-compensation step, in
    /// seconds.
    pub const MAX_DRIFT_COMPENSATION: f64 = 0.016;
}
