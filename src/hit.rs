#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::archive::{Dream, DreamId};
use crate::board::TileLayout;
use crate::camera::Point;
use crate::geom;
use crate::overlay::{Overlay, OverlayId};

/// Topmost overlay under a canvas-space point. Later overlays draw on top.
#[must_use]
pub fn overlay_at(overlays: &[Overlay], p: Point) -> Option<OverlayId> {
    overlays.iter().rev().find(|o| o.contains(p)).map(|o| o.id)
}

/// Every dream whose tile (grown by `tolerance`) contains the board-space
/// point, in archive order. Overlapping tiles all match.
pub fn tiles_at<'a>(
    dreams: &'a [Dream],
    layout: &'a TileLayout,
    p: Point,
    tolerance: f64,
) -> impl Iterator<Item = DreamId> + 'a {
    dreams
        .iter()
        .filter(move |d| geom::point_in_rect(p, layout.tile_rect(d.placement), tolerance))
        .map(|d| d.id)
}

/// Topmost tile under a board-space point, without tolerance.
#[must_use]
pub fn topmost_tile(dreams: &[Dream], layout: &TileLayout, p: Point) -> Option<DreamId> {
    dreams
        .iter()
        .rev()
        .find(|d| layout.tile_rect(d.placement).contains(p))
        .map(|d| d.id)
}
