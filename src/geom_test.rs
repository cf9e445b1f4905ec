#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// =============================================================
// Rect
// =============================================================

#[test]
fn rect_contains_is_inclusive() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains(Point::new(0.0, 0.0)));
    assert!(r.contains(Point::new(10.0, 10.0)));
    assert!(r.contains(Point::new(5.0, 5.0)));
    assert!(!r.contains(Point::new(10.1, 5.0)));
    assert!(!r.contains(Point::new(5.0, -0.1)));
}

#[test]
fn rect_inflate_grows_every_side() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0).inflate(5.0);
    assert_eq!(r, Rect::new(5.0, 15.0, 40.0, 50.0));
}

#[test]
fn rect_enclosing_empty_is_none() {
    assert!(Rect::enclosing(&[]).is_none());
}

#[test]
fn rect_enclosing_covers_all_points() {
    let r = Rect::enclosing(&[5.0, 5.0, -5.0, 10.0, 20.0, 0.0]).unwrap_or_default();
    assert_eq!(r, Rect::new(-5.0, 0.0, 25.0, 10.0));
    assert!(point_approx_eq(r.center(), Point::new(7.5, 5.0)));
}

// =============================================================
// Distance / containment
// =============================================================

#[test]
fn distance_is_euclidean() {
    assert!(approx_eq(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_in_rect_honours_tolerance() {
    let r = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert!(!point_in_rect(Point::new(103.0, 50.0), r, 0.0));
    assert!(point_in_rect(Point::new(103.0, 50.0), r, 4.0));
    assert!(!point_in_rect(Point::new(105.0, 50.0), r, 4.0));
}

// =============================================================
// Point lists
// =============================================================

#[test]
fn pairs_ignores_trailing_odd_value() {
    let pts: Vec<Point> = pairs(&[1.0, 2.0, 3.0, 4.0, 5.0]).collect();
    assert_eq!(pts, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
}

#[test]
fn flatten_inverts_pairs() {
    let flat = vec![1.0, 2.0, 3.0, 4.0];
    assert_eq!(flatten(pairs(&flat)), flat);
}

#[test]
fn centroid_of_empty_is_none() {
    assert!(centroid(&[]).is_none());
}

#[test]
fn centroid_of_square() {
    let c = centroid(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0]);
    assert_eq!(c, Some(Point::new(5.0, 5.0)));
}

// =============================================================
// Shape generation
// =============================================================

#[test]
fn regular_polygon_has_requested_sides_on_circle() {
    let center = Point::new(50.0, 50.0);
    for sides in 3..=6 {
        let flat = regular_polygon(center, 40.0, sides);
        assert_eq!(flat.len(), sides * 2);
        for p in pairs(&flat) {
            assert!(approx_eq(distance(p, center), 40.0));
        }
    }
}

#[test]
fn regular_polygon_first_vertex_points_up() {
    let flat = regular_polygon(Point::new(0.0, 0.0), 10.0, 4);
    let first = pairs(&flat).next().unwrap_or_default();
    assert!(point_approx_eq(first, Point::new(0.0, -10.0)));
}

#[test]
fn regular_polygon_clamps_to_triangle() {
    assert_eq!(regular_polygon(Point::default(), 1.0, 1).len(), 6);
}

#[test]
fn blob_radii_within_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    let center = Point::new(100.0, 100.0);
    let flat = blob(&mut rng, center, 10, 60.0, 100.0);
    assert_eq!(flat.len(), 20);
    for p in pairs(&flat) {
        let d = distance(p, center);
        assert!((60.0 - EPSILON..100.0 + EPSILON).contains(&d), "radius {d} out of range");
    }
}

#[test]
fn blob_is_deterministic_for_seed() {
    let a = blob(&mut StdRng::seed_from_u64(3), Point::default(), 9, 50.0, 90.0);
    let b = blob(&mut StdRng::seed_from_u64(3), Point::default(), 9, 50.0, 90.0);
    assert_eq!(a, b);
}

// =============================================================
// Spiral
// =============================================================

#[test]
fn spiral_at_zero_is_identity() {
    let center = Point::new(10.0, 20.0);
    let p = Point::new(-33.0, 71.0);
    assert!(point_approx_eq(spiral_point(p, center, 0.0), p));
}

#[test]
fn spiral_at_one_collapses_to_center() {
    let center = Point::new(10.0, 20.0);
    let p = Point::new(-33.0, 71.0);
    assert!(point_approx_eq(spiral_point(p, center, 1.0), center));
}

#[test]
fn spiral_half_way_rotates_half_turn_and_halves_radius() {
    let center = Point::new(0.0, 0.0);
    let out = spiral_point(Point::new(10.0, 0.0), center, 0.5);
    assert!(point_approx_eq(out, Point::new(-5.0, 0.0)));
}

#[test]
fn spiral_clamps_progress() {
    let center = Point::new(1.0, 1.0);
    let p = Point::new(4.0, 5.0);
    assert!(point_approx_eq(spiral_point(p, center, 2.0), center));
    assert!(point_approx_eq(spiral_point(p, center, -1.0), p));
}

// =============================================================
// Rotation / polygons
// =============================================================

#[test]
fn rotate_about_quarter_turn() {
    let out = rotate_about(Point::new(10.0, 0.0), Point::new(0.0, 0.0), 90.0);
    assert!(point_approx_eq(out, Point::new(0.0, 10.0)));
}

#[test]
fn point_in_polygon_triangle() {
    let tri = [0.0, 0.0, 10.0, 0.0, 0.0, 10.0];
    assert!(point_in_polygon(Point::new(2.0, 2.0), &tri));
    assert!(!point_in_polygon(Point::new(8.0, 8.0), &tri));
}

#[test]
fn point_in_polygon_degenerate_is_false() {
    assert!(!point_in_polygon(Point::new(0.0, 0.0), &[0.0, 0.0, 1.0, 1.0]));
}
