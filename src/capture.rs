//! Freehand stroke capture with loop-closure detection.
//!
//! [`StrokeCapture`] tracks the stroke currently under the pointer. The
//! stroke's points live in the [`Sketch`] so they render live; the capture
//! only remembers where the gesture started and decides, on release, whether
//! the user closed a loop.
//!
//! A loop closes when the stroke holds more than `min_points` points and the
//! release point lands strictly inside `closure_radius` of the start point.
//! A release exactly on the radius does not close. A release with no position
//! (pointer left the surface) never closes.

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{CLOSURE_MIN_POINTS, CLOSURE_RADIUS, STROKE_WIDTH};
use crate::geom;
use crate::stroke::{Sketch, Stroke, Tool};

/// Loop-closure thresholds and stroke defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// A stroke needs strictly more points than this to close a loop.
    pub min_points: usize,
    /// Release must land strictly inside this distance of the start point.
    pub closure_radius: f64,
    /// Width given to new strokes.
    pub stroke_width: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { min_points: CLOSURE_MIN_POINTS, closure_radius: CLOSURE_RADIUS, stroke_width: STROKE_WIDTH }
    }
}

/// Outcome of releasing a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Closure {
    /// No stroke was in progress.
    NoStroke,
    /// The stroke stays on the canvas as drawn.
    Open,
    /// The stroke closed a loop; `centroid` is the closing stroke's centroid.
    Closed { centroid: Point },
}

/// Whether a stroke of `point_count` points released at `end` closes a loop
/// started at `start`.
#[must_use]
pub fn closes_loop(config: &CaptureConfig, point_count: usize, start: Point, end: Option<Point>) -> bool {
    if point_count <= config.min_points {
        return false;
    }
    end.is_some_and(|end| geom::distance(start, end) < config.closure_radius)
}

/// In-progress stroke tracker.
#[derive(Debug, Clone, Default)]
pub struct StrokeCapture {
    config: CaptureConfig,
    start: Option<Point>,
}

impl StrokeCapture {
    #[must_use]
    pub fn new(config: CaptureConfig) -> Self {
        Self { config, start: None }
    }

    #[must_use]
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Whether a stroke is currently being drawn.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Start a new stroke at `start` and push it onto the sketch.
    pub fn begin(&mut self, sketch: &mut Sketch, start: Point, color: &str, tool: Tool) {
        sketch.push_stroke(Stroke::new(start, color, self.config.stroke_width, tool));
        self.start = Some(start);
    }

    /// Append `p` to the active stroke. No-op when no stroke is active.
    pub fn extend(&mut self, sketch: &mut Sketch, p: Point) -> bool {
        if self.start.is_none() {
            return false;
        }
        sketch.extend_last(p)
    }

    /// End the active stroke and evaluate loop closure against `end`.
    pub fn finish(&mut self, sketch: &Sketch, end: Option<Point>) -> Closure {
        let Some(start) = self.start.take() else {
            return Closure::NoStroke;
        };
        let Some(stroke) = sketch.last_stroke() else {
            return Closure::Open;
        };

        let count = stroke.point_count();
        if !closes_loop(&self.config, count, start, end) {
            tracing::debug!(points = count, min_points = self.config.min_points, "stroke left open");
            return Closure::Open;
        }
        match stroke.centroid() {
            Some(centroid) => Closure::Closed { centroid },
            None => Closure::Open,
        }
    }

    /// Drop any in-progress stroke tracking without evaluating closure.
    pub fn cancel(&mut self) {
        self.start = None;
    }
}
