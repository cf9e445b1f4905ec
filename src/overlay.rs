//! Frame overlays: parametric shapes placed over the sketch, each carrying a
//! lens filter that changes how it composites with the ink beneath.
//!
//! Overlays are values. Every edit (`cycle_filter`, `apply_transform`)
//! returns a new `Overlay` and leaves the original untouched, so the shared
//! overlay list in [`crate::stroke::Sketch`] can be swapped atomically.
//!
//! Shape geometry is stored in overlay-local coordinates; `(x, y)` is the
//! overlay origin on the canvas and `rotation` turns the shape around that
//! origin. Deserialized shapes missing a kind-specific field take the
//! defaults from [`crate::consts`].

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{BLOB_TENSION, OVERLAY_MIN_SIZE, OVERLAY_RADIUS, OVERLAY_SIZE, OVERLAY_STROKE_WIDTH, SPLINE_TENSION};
use crate::geom::{self, Rect};
use crate::render::{self, CompositeOp, DrawCommand};

/// Unique identifier for an overlay.
pub type OverlayId = Uuid;

/// Number of segments used when a circle has to be expressed as vertices.
const CIRCLE_SEGMENTS: usize = 32;

// =============================================================
// Filter table
// =============================================================

/// Lens filter applied to an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Normal,
    Invert,
    Emotion,
    Interference,
}

/// Static description of one filter mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub mode: FilterMode,
    pub name: &'static str,
    /// Compositing operation for the lens layer.
    pub op: CompositeOp,
    /// Lens fill tint.
    pub fill: &'static str,
    /// Frame stroke color.
    pub stroke: &'static str,
    /// Short hint drawn inside the frame. Empty for `Normal`.
    pub label: &'static str,
    /// Opacity of the lens layer.
    pub lens_opacity: f64,
}

/// Every filter mode in cycle order.
pub const FILTER_TABLE: [FilterSpec; 4] = [
    FilterSpec {
        mode: FilterMode::Normal,
        name: "normal",
        op: CompositeOp::SourceOver,
        fill: "transparent",
        stroke: "#000",
        label: "",
        lens_opacity: 1.0,
    },
    FilterSpec {
        mode: FilterMode::Invert,
        name: "invert",
        op: CompositeOp::Difference,
        fill: "#fff",
        stroke: "#fff",
        label: "?",
        lens_opacity: 1.0,
    },
    FilterSpec {
        mode: FilterMode::Emotion,
        name: "emotion",
        op: CompositeOp::Multiply,
        fill: "#f4a460",
        stroke: "#f4a460",
        label: "\u{2665}",
        lens_opacity: 0.5,
    },
    FilterSpec {
        mode: FilterMode::Interference,
        name: "interference",
        op: CompositeOp::Exclusion,
        fill: "#00ffeb",
        stroke: "#00ffeb",
        label: "\u{26a1}",
        lens_opacity: 1.0,
    },
];

impl FilterMode {
    /// Position of this mode in [`FILTER_TABLE`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Invert => 1,
            Self::Emotion => 2,
            Self::Interference => 3,
        }
    }

    #[must_use]
    pub fn spec(self) -> &'static FilterSpec {
        &FILTER_TABLE[self.index()]
    }

    /// The following mode in table order, wrapping after the last.
    #[must_use]
    pub fn next(self) -> Self {
        FILTER_TABLE[(self.index() + 1) % FILTER_TABLE.len()].mode
    }

    /// Whether this mode draws a lens layer at all.
    #[must_use]
    pub fn has_lens(self) -> bool {
        self != Self::Normal
    }
}

// =============================================================
// Shapes
// =============================================================

/// The shape kinds an overlay can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Circle,
    Polygon,
    Spline,
}

fn default_size() -> f64 {
    OVERLAY_SIZE
}

fn default_radius() -> f64 {
    OVERLAY_RADIUS
}

fn default_tension() -> f64 {
    SPLINE_TENSION
}

fn default_stroke() -> String {
    FILTER_TABLE[0].stroke.to_owned()
}

fn default_stroke_width() -> f64 {
    OVERLAY_STROKE_WIDTH
}

/// Kind-specific geometry in overlay-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Rectangle anchored at the local origin.
    Rect {
        #[serde(default = "default_size")]
        width: f64,
        #[serde(default = "default_size")]
        height: f64,
    },
    /// Circle whose bounding box is anchored at the local origin.
    Circle {
        #[serde(default = "default_radius")]
        radius: f64,
    },
    /// Closed straight-edged polygon.
    Polygon {
        #[serde(default)]
        points: Vec<f64>,
    },
    /// Smooth curve interpolated through its control points.
    Spline {
        #[serde(default)]
        points: Vec<f64>,
        #[serde(default = "default_tension")]
        tension: f64,
        #[serde(default)]
        closed: bool,
    },
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rect { .. } => ShapeKind::Rect,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Polygon { .. } => ShapeKind::Polygon,
            Self::Spline { .. } => ShapeKind::Spline,
        }
    }

    /// Outline vertices in local coordinates. Circles are sampled.
    #[must_use]
    pub fn vertices(&self) -> Vec<f64> {
        match self {
            Self::Rect { width, height } => vec![0.0, 0.0, *width, 0.0, *width, *height, 0.0, *height],
            Self::Circle { radius } => geom::regular_polygon(Point::new(*radius, *radius), *radius, CIRCLE_SEGMENTS),
            Self::Polygon { points } | Self::Spline { points, .. } => points.clone(),
        }
    }

    /// Local bounding box. Degenerate shapes report an empty box at the origin.
    #[must_use]
    pub fn local_bounds(&self) -> Rect {
        match self {
            Self::Rect { width, height } => Rect::new(0.0, 0.0, *width, *height),
            Self::Circle { radius } => Rect::new(0.0, 0.0, radius * 2.0, radius * 2.0),
            Self::Polygon { points } | Self::Spline { points, .. } => Rect::enclosing(points).unwrap_or_default(),
        }
    }

    /// Containment in local coordinates.
    #[must_use]
    pub fn contains_local(&self, p: Point) -> bool {
        match self {
            Self::Rect { width, height } => Rect::new(0.0, 0.0, *width, *height).contains(p),
            Self::Circle { radius } => geom::distance(p, Point::new(*radius, *radius)) <= *radius,
            Self::Polygon { points } => geom::point_in_polygon(p, points),
            Self::Spline { points, closed: true, .. } => geom::point_in_polygon(p, points),
            Self::Spline { points, closed: false, .. } => {
                Rect::enclosing(points).is_some_and(|r| r.contains(p))
            }
        }
    }

    /// Scale about the local origin. Circles scale by the geometric mean.
    #[must_use]
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        let scale_points = |points: &[f64]| geom::flatten(geom::pairs(points).map(|p| Point::new(p.x * sx, p.y * sy)));
        match self {
            Self::Rect { width, height } => Self::Rect { width: width * sx, height: height * sy },
            Self::Circle { radius } => Self::Circle { radius: radius * (sx * sy).sqrt() },
            Self::Polygon { points } => Self::Polygon { points: scale_points(points) },
            Self::Spline { points, tension, closed } => {
                Self::Spline { points: scale_points(points), tension: *tension, closed: *closed }
            }
        }
    }
}

// =============================================================
// Overlay
// =============================================================

/// Copy-on-write geometric edit applied by [`Overlay::apply_transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Move the overlay origin.
    Translate { dx: f64, dy: f64 },
    /// Scale the shape about the overlay origin.
    Resize { sx: f64, sy: f64 },
    /// Add to the rotation, in degrees clockwise.
    Rotate { degrees: f64 },
}

/// A frame overlay on the drawing canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub id: OverlayId,
    pub x: f64,
    pub y: f64,
    /// Clockwise rotation in degrees around `(x, y)`.
    #[serde(default)]
    pub rotation: f64,
    #[serde(flatten)]
    pub shape: Shape,
    /// Frame color used while the filter is `Normal`.
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default, rename = "filterMode")]
    pub filter: FilterMode,
}

impl Overlay {
    /// Build an overlay with the given shape and default styling.
    #[must_use]
    pub fn with_shape(shape: Shape, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            rotation: 0.0,
            shape,
            stroke: default_stroke(),
            stroke_width: OVERLAY_STROKE_WIDTH,
            filter: FilterMode::Normal,
        }
    }

    /// Create a fresh overlay of `kind` with its origin at `(origin_x, origin_y)`.
    ///
    /// Polygons get 3 to 6 regular vertices; splines get an 8 to 11 point
    /// closed blob at randomized radii. Both are centred in a default-sized
    /// local box.
    pub fn create<R: Rng>(kind: ShapeKind, origin_x: f64, origin_y: f64, rng: &mut R) -> Self {
        let half = OVERLAY_SIZE / 2.0;
        let local_center = Point::new(half, half);
        let shape = match kind {
            ShapeKind::Rect => Shape::Rect { width: OVERLAY_SIZE, height: OVERLAY_SIZE },
            ShapeKind::Circle => Shape::Circle { radius: OVERLAY_RADIUS },
            ShapeKind::Polygon => {
                let sides = rng.random_range(3..=6);
                Shape::Polygon { points: geom::regular_polygon(local_center, half, sides) }
            }
            ShapeKind::Spline => {
                let count = rng.random_range(8..=11);
                Shape::Spline {
                    points: geom::blob(rng, local_center, count, half * 0.6, half),
                    tension: BLOB_TENSION,
                    closed: true,
                }
            }
        };
        Self::with_shape(shape, origin_x, origin_y)
    }

    /// The default "+ Frame" overlay: a square centred in the viewport.
    #[must_use]
    pub fn centered_frame(viewport_width: f64, viewport_height: f64) -> Self {
        let half = OVERLAY_SIZE / 2.0;
        Self::with_shape(
            Shape::Rect { width: OVERLAY_SIZE, height: OVERLAY_SIZE },
            viewport_width / 2.0 - half,
            viewport_height / 2.0 - half,
        )
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Outline vertices in canvas coordinates, rotation applied.
    #[must_use]
    pub fn vertices(&self) -> Vec<f64> {
        let origin = self.origin();
        geom::flatten(
            geom::pairs(&self.shape.vertices())
                .map(|p| geom::rotate_about(Point::new(p.x + self.x, p.y + self.y), origin, self.rotation)),
        )
    }

    /// Canvas-space axis-aligned bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        Rect::enclosing(&self.vertices()).unwrap_or(Rect::new(self.x, self.y, 0.0, 0.0))
    }

    /// Whether a canvas-space point falls inside the shape.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let unrotated = geom::rotate_about(p, self.origin(), -self.rotation);
        self.shape.contains_local(Point::new(unrotated.x - self.x, unrotated.y - self.y))
    }

    /// Copy of this overlay with the filter advanced one step.
    #[must_use]
    pub fn cycle_filter(&self) -> Self {
        Self { filter: self.filter.next(), ..self.clone() }
    }

    /// Copy of this overlay with `transform` applied.
    ///
    /// A resize that would shrink the bounding box below the minimum size,
    /// or that uses a non-positive or non-finite factor, yields an unchanged
    /// copy.
    #[must_use]
    pub fn apply_transform(&self, transform: Transform) -> Self {
        match transform {
            Transform::Translate { dx, dy } => Self { x: self.x + dx, y: self.y + dy, ..self.clone() },
            Transform::Rotate { degrees } => Self { rotation: (self.rotation + degrees).rem_euclid(360.0), ..self.clone() },
            Transform::Resize { sx, sy } => {
                if !(sx.is_finite() && sy.is_finite()) || sx <= 0.0 || sy <= 0.0 {
                    return self.clone();
                }
                let shape = self.shape.scaled(sx, sy);
                let bounds = shape.local_bounds();
                if bounds.width < OVERLAY_MIN_SIZE || bounds.height < OVERLAY_MIN_SIZE {
                    return self.clone();
                }
                Self { shape, ..self.clone() }
            }
        }
    }

    /// Drawable description of this overlay under its current filter.
    #[must_use]
    pub fn render(&self) -> DrawCommand {
        render::overlay_command(self)
    }
}
