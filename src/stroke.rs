//! Ink strokes, the ink palette, and the canvas sketch snapshot.
//!
//! A [`Sketch`] is the copy-on-write state of the drawing canvas: the strokes
//! and overlays currently on screen. Both lists sit behind `Arc`, so a reader
//! that cloned the sketch keeps a consistent view while the owner appends
//! points or replaces overlays through `Arc::make_mut`.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::geom;
use crate::overlay::{Overlay, OverlayId};

/// Drawing tool for freehand strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Paints ink over whatever is underneath.
    #[default]
    Pen,
    /// Erases pixels along its path.
    Eraser,
}

/// A named ink from the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ink {
    pub name: &'static str,
    pub hex: &'static str,
}

/// The fixed ink palette, in display order.
pub const PALETTE: [Ink; 6] = [
    Ink { name: "Fire", hex: "#e53935" },
    Ink { name: "Water", hex: "#039be5" },
    Ink { name: "Earth", hex: "#43a047" },
    Ink { name: "Air", hex: "#fdd835" },
    Ink { name: "Spirit", hex: "#8e24aa" },
    Ink { name: "Void", hex: "#2c2c2c" },
];

/// Ink selected when the engine starts.
pub const DEFAULT_INK: &str = "#2c2c2c";

/// Look up a palette ink by name, case-insensitively.
#[must_use]
pub fn ink_by_name(name: &str) -> Option<Ink> {
    PALETTE.iter().copied().find(|ink| ink.name.eq_ignore_ascii_case(name))
}

/// A freehand stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Flattened `[x0, y0, x1, y1, ...]` canvas coordinates.
    pub points: Vec<f64>,
    /// CSS color string.
    pub color: String,
    /// Line width in canvas units.
    pub width: f64,
    /// Pen or eraser.
    pub tool: Tool,
}

impl Stroke {
    /// Start a stroke seeded with a single point.
    #[must_use]
    pub fn new(start: Point, color: impl Into<String>, width: f64, tool: Tool) -> Self {
        Self { points: vec![start.x, start.y], color: color.into(), width, tool }
    }

    /// Append a point to the end of the stroke.
    pub fn push(&mut self, p: Point) {
        self.points.push(p.x);
        self.points.push(p.y);
    }

    /// Number of points (coordinate pairs), not coordinates.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len() / 2
    }

    #[must_use]
    pub fn first_point(&self) -> Option<Point> {
        geom::pairs(&self.points).next()
    }

    #[must_use]
    pub fn last_point(&self) -> Option<Point> {
        geom::pairs(&self.points).last()
    }

    #[must_use]
    pub fn centroid(&self) -> Option<Point> {
        geom::centroid(&self.points)
    }

    /// Copy of this stroke with every point passed through `f`.
    #[must_use]
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            points: geom::flatten(geom::pairs(&self.points).map(f)),
            color: self.color.clone(),
            width: self.width,
            tool: self.tool,
        }
    }
}

/// The strokes and overlays currently on the drawing canvas.
#[derive(Debug, Clone, Default)]
pub struct Sketch {
    strokes: Arc<Vec<Stroke>>,
    overlays: Arc<Vec<Overlay>>,
}

impl Sketch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    #[must_use]
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Shared handle to the current stroke list.
    #[must_use]
    pub fn stroke_snapshot(&self) -> Arc<Vec<Stroke>> {
        Arc::clone(&self.strokes)
    }

    /// Shared handle to the current overlay list.
    #[must_use]
    pub fn overlay_snapshot(&self) -> Arc<Vec<Overlay>> {
        Arc::clone(&self.overlays)
    }

    /// Returns `true` when there is nothing on the canvas to capture.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.overlays.is_empty()
    }

    pub fn push_stroke(&mut self, stroke: Stroke) {
        Arc::make_mut(&mut self.strokes).push(stroke);
    }

    /// Append a point to the most recent stroke. Returns false if there is none.
    pub fn extend_last(&mut self, p: Point) -> bool {
        match Arc::make_mut(&mut self.strokes).last_mut() {
            Some(stroke) => {
                stroke.push(p);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn last_stroke(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    pub fn push_overlay(&mut self, overlay: Overlay) {
        Arc::make_mut(&mut self.overlays).push(overlay);
    }

    #[must_use]
    pub fn overlay(&self, id: &OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| &o.id == id)
    }

    /// Swap in a new version of an existing overlay, matched by id.
    /// Returns false if no overlay has that id.
    pub fn replace_overlay(&mut self, next: Overlay) -> bool {
        let Some(idx) = self.overlays.iter().position(|o| o.id == next.id) else {
            return false;
        };
        if let Some(slot) = Arc::make_mut(&mut self.overlays).get_mut(idx) {
            *slot = next;
        }
        true
    }

    /// Remove everything from the canvas.
    pub fn clear(&mut self) {
        self.strokes = Arc::new(Vec::new());
        self.overlays = Arc::new(Vec::new());
    }

    /// Centroid of every stroke point on the canvas.
    #[must_use]
    pub fn centroid(&self) -> Option<Point> {
        let all: Vec<f64> = self.strokes.iter().flat_map(|s| s.points.iter().copied()).collect();
        geom::centroid(&all)
    }
}
