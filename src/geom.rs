//! Pure geometry helpers shared by strokes, overlays, the board, and the
//! spiral animator. Nothing here holds state.
//!
//! Point lists are stored flattened (`[x0, y0, x1, y1, ...]`) to match the
//! polyline format the rendering substrate consumes; [`pairs`] views them as
//! [`Point`]s.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::camera::Point;

/// Axis-aligned rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Grow the rectangle by `margin` on every side.
    #[must_use]
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle enclosing every point, or `None` for an empty list.
    #[must_use]
    pub fn enclosing(points: &[f64]) -> Option<Self> {
        let mut it = pairs(points);
        let first = it.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in it {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Point-in-rectangle with a tolerance margin around the rectangle.
#[must_use]
pub fn point_in_rect(p: Point, rect: Rect, tolerance: f64) -> bool {
    rect.inflate(tolerance).contains(p)
}

/// View a flattened coordinate list as points. A trailing odd value is ignored.
pub fn pairs(flat: &[f64]) -> impl Iterator<Item = Point> + '_ {
    flat.chunks_exact(2).filter_map(|c| match c {
        [x, y] => Some(Point::new(*x, *y)),
        _ => None,
    })
}

/// Flatten points back into `[x0, y0, x1, y1, ...]`.
#[must_use]
pub fn flatten(points: impl IntoIterator<Item = Point>) -> Vec<f64> {
    points.into_iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Arithmetic mean of a flattened point list.
#[must_use]
pub fn centroid(flat: &[f64]) -> Option<Point> {
    let mut count = 0usize;
    let (mut sx, mut sy) = (0.0, 0.0);
    for p in pairs(flat) {
        sx += p.x;
        sy += p.y;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let n = count as f64;
    Some(Point::new(sx / n, sy / n))
}

/// Vertices of a regular polygon with the first vertex pointing straight up.
#[must_use]
pub fn regular_polygon(center: Point, radius: f64, sides: usize) -> Vec<f64> {
    let sides = sides.max(3);
    let step = TAU / sides as f64;
    flatten((0..sides).map(|i| {
        let angle = step.mul_add(i as f64, -std::f64::consts::FRAC_PI_2);
        Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    }))
}

/// Evenly spaced points at a random radius in `[min_radius, max_radius)`,
/// forming an amorphous closed blob when drawn as a spline.
pub fn blob<R: Rng>(rng: &mut R, center: Point, count: usize, min_radius: f64, max_radius: f64) -> Vec<f64> {
    let count = count.max(3);
    let step = TAU / count as f64;
    flatten((0..count).map(|i| {
        let radius = if max_radius > min_radius {
            rng.random_range(min_radius..max_radius)
        } else {
            min_radius
        };
        let angle = step * i as f64;
        Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    }))
}

/// Spiral a point toward `center`.
///
/// At `progress` p the point is rotated by `p * 2π` around `center` and its
/// distance to `center` is scaled by `1 - p`. Progress is clamped to `[0, 1]`.
#[must_use]
pub fn spiral_point(p: Point, center: Point, progress: f64) -> Point {
    let progress = progress.clamp(0.0, 1.0);
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    let radius = dx.hypot(dy) * (1.0 - progress);
    let angle = dy.atan2(dx) + progress * TAU;
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Rotate `p` by `degrees` clockwise (screen space, y down) around `pivot`.
#[must_use]
pub fn rotate_about(p: Point, pivot: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    Point::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
}

/// Even-odd ray-cast point-in-polygon test over a flattened vertex list.
#[must_use]
pub fn point_in_polygon(p: Point, flat: &[f64]) -> bool {
    let verts: Vec<Point> = pairs(flat).collect();
    if verts.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = verts.len() - 1;
    for i in 0..verts.len() {
        let (a, b) = (verts[i], verts[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
