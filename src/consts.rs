//! Shared numeric constants for the dreamboard crate.

// ── Loop closure ────────────────────────────────────────────────

/// A stroke must hold more than this many points before it can close a loop.
pub const CLOSURE_MIN_POINTS: usize = 15;

/// End point must land strictly inside this radius of the start point.
pub const CLOSURE_RADIUS: f64 = 30.0;

// ── Ink ─────────────────────────────────────────────────────────

/// Default stroke width for pen and eraser.
pub const STROKE_WIDTH: f64 = 5.0;

/// Smoothing tension used when drawing strokes.
pub const STROKE_TENSION: f64 = 0.5;

// ── Animation ───────────────────────────────────────────────────

/// Spiral consolidation duration.
pub const SPIRAL_DURATION_MS: f64 = 800.0;

/// Stream dwell time on each dream before auto-advancing.
pub const STREAM_DWELL_MS: f64 = 2000.0;

/// Stream transition duration.
pub const STREAM_TRANSITION_MS: f64 = 1000.0;

/// Transition progress at which the displayed dream swaps.
pub const STREAM_SWAP_PROGRESS: f64 = 0.5;

// ── Overlays ────────────────────────────────────────────────────

/// Default rectangle overlay side length.
pub const OVERLAY_SIZE: f64 = 200.0;

/// Default circle overlay radius.
pub const OVERLAY_RADIUS: f64 = 100.0;

/// Default spline tension when the field is absent.
pub const SPLINE_TENSION: f64 = 0.5;

/// Tension used for synthesized blob splines.
pub const BLOB_TENSION: f64 = 0.4;

/// Default overlay frame stroke width.
pub const OVERLAY_STROKE_WIDTH: f64 = 5.0;

/// Resizes producing a box smaller than this on either axis are rejected.
pub const OVERLAY_MIN_SIZE: f64 = 5.0;

/// Font size for the lens label drawn inside a filtered overlay.
pub const OVERLAY_LABEL_SIZE: f64 = 24.0;

// ── Board ───────────────────────────────────────────────────────

/// Columns in the capture-time grid layout.
pub const BOARD_COLS: usize = 3;

/// Gap between tiles and around the grid.
pub const BOARD_MARGIN: f64 = 20.0;

/// Slop added around each tile when testing connectivity pen points.
pub const TILE_HIT_TOLERANCE: f64 = 4.0;

/// Minimum zoom level (10%).
pub const ZOOM_MIN: f64 = 0.1;

/// Maximum zoom level (1000%).
pub const ZOOM_MAX: f64 = 10.0;

// ── Viewport ────────────────────────────────────────────────────

/// Viewport width assumed until the host reports one.
pub const VIEWPORT_WIDTH: f64 = 1280.0;

/// Viewport height assumed until the host reports one.
pub const VIEWPORT_HEIGHT: f64 = 800.0;
