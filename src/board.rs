//! The dream board: archived dreams laid out as tiles on a pannable,
//! zoomable surface, plus the connectivity pen that strings them into a
//! stream sequence.
//!
//! In [`BoardMode::Move`] a drag on a tile repositions that dream and a drag
//! on empty space pans. In [`BoardMode::Connect`] every drag draws a new
//! [`ConnectivityPath`] in board coordinates. Paths are kept until
//! [`Board::reset_flow`].
//!
//! The stream sequence is always derived, never edited: [`compute_sequence`]
//! walks every path point in order and records each dream the first time a
//! point lands on its tile. It reruns after any path or placement change. An
//! empty result is dropped so a transient state never blanks a sequence that
//! was valid a moment ago.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::archive::{Dream, DreamArchive, DreamId};
use crate::camera::{Camera, Point};
use crate::consts::{BOARD_COLS, BOARD_MARGIN, TILE_HIT_TOLERANCE, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::geom::Rect;
use crate::hit;

/// Tile geometry shared by capture-time placement and board hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileLayout {
    pub cols: usize,
    pub margin: f64,
    pub tile_width: f64,
    pub tile_height: f64,
    /// Size of the canvas the dream content was drawn on.
    pub source_width: f64,
    pub source_height: f64,
    /// Slop around each tile for connectivity hits.
    pub tolerance: f64,
}

impl Default for TileLayout {
    fn default() -> Self {
        Self::for_viewport(VIEWPORT_WIDTH, VIEWPORT_HEIGHT, BOARD_COLS, BOARD_MARGIN, TILE_HIT_TOLERANCE)
    }
}

impl TileLayout {
    /// Fit `cols` tiles across a viewport, keeping the viewport aspect ratio.
    #[must_use]
    pub fn for_viewport(width: f64, height: f64, cols: usize, margin: f64, tolerance: f64) -> Self {
        let cols = cols.max(1);
        let n = cols as f64;
        let tile_width = ((width - margin * (n + 1.0)) / n).max(1.0);
        let scale = if width > 0.0 { tile_width / width } else { 1.0 };
        Self {
            cols,
            margin,
            tile_width,
            tile_height: height * scale,
            source_width: width,
            source_height: height,
            tolerance,
        }
    }

    /// Uniform scale from dream canvas space to tile space.
    #[must_use]
    pub fn scale(&self) -> f64 {
        if self.source_width > 0.0 { self.tile_width / self.source_width } else { 1.0 }
    }

    /// Grid slot for the dream at `index` in capture order.
    #[must_use]
    pub fn grid_position(&self, index: usize) -> Point {
        let cols = self.cols.max(1);
        let col = (index % cols) as f64;
        let row = (index / cols) as f64;
        Point::new(
            self.margin + col * (self.tile_width + self.margin),
            self.margin + row * (self.tile_height + self.margin),
        )
    }

    /// Board-space rectangle of a tile placed at `placement`.
    #[must_use]
    pub fn tile_rect(&self, placement: Point) -> Rect {
        Rect::new(placement.x, placement.y, self.tile_width, self.tile_height)
    }
}

/// A freehand path drawn with the connectivity pen, in board coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityPath {
    points: Vec<f64>,
}

impl ConnectivityPath {
    #[must_use]
    pub fn starting_at(p: Point) -> Self {
        Self { points: vec![p.x, p.y] }
    }

    #[must_use]
    pub fn from_points(points: &[Point]) -> Self {
        Self { points: crate::geom::flatten(points.iter().copied()) }
    }

    pub fn push(&mut self, p: Point) {
        self.points.push(p.x);
        self.points.push(p.y);
    }

    /// Flattened `[x0, y0, ...]` coordinates.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len() / 2
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }
}

/// Derive the ordered, de-duplicated dream sequence touched by `paths`.
///
/// Paths are walked in order, each path's points in ascending order, and for
/// each point every dream in archive order. A dream is appended on its first
/// hit only.
#[must_use]
pub fn compute_sequence(paths: &[ConnectivityPath], dreams: &[Dream], layout: &TileLayout) -> Vec<DreamId> {
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    for path in paths {
        for p in crate::geom::pairs(path.points()) {
            for id in hit::tiles_at(dreams, layout, p, layout.tolerance) {
                if visited.insert(id) {
                    order.push(id);
                }
            }
        }
    }
    order
}

/// Board interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardMode {
    /// Drag tiles and pan the board.
    #[default]
    Move,
    /// Draw connectivity paths.
    Connect,
}

/// Something the host should react to after a board gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardChange {
    /// A tile was dragged to a new placement.
    DreamMoved { id: DreamId, placement: Point },
    /// The derived stream sequence was replaced.
    SequenceChanged(Arc<Vec<DreamId>>),
    /// Camera or path geometry changed.
    Redraw,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Panning { last_screen: Point },
    DraggingTile { id: DreamId, last_world: Point },
    Connecting,
}

/// Board view state: camera, pen paths, and the derived stream sequence.
#[derive(Debug, Clone)]
pub struct Board {
    pub camera: Camera,
    mode: BoardMode,
    layout: TileLayout,
    paths: Arc<Vec<ConnectivityPath>>,
    sequence: Arc<Vec<DreamId>>,
    gesture: Gesture,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(TileLayout::default())
    }
}

impl Board {
    #[must_use]
    pub fn new(layout: TileLayout) -> Self {
        Self {
            camera: Camera::default(),
            mode: BoardMode::Move,
            layout,
            paths: Arc::new(Vec::new()),
            sequence: Arc::new(Vec::new()),
            gesture: Gesture::Idle,
        }
    }

    #[must_use]
    pub fn mode(&self) -> BoardMode {
        self.mode
    }

    /// Switch interaction mode. Any gesture in progress is dropped.
    pub fn set_mode(&mut self, mode: BoardMode) {
        self.mode = mode;
        self.gesture = Gesture::Idle;
    }

    #[must_use]
    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: TileLayout) {
        self.layout = layout;
    }

    #[must_use]
    pub fn paths(&self) -> &[ConnectivityPath] {
        &self.paths
    }

    #[must_use]
    pub fn sequence(&self) -> &[DreamId] {
        &self.sequence
    }

    /// Shared handle to the current stream sequence.
    #[must_use]
    pub fn sequence_snapshot(&self) -> Arc<Vec<DreamId>> {
        Arc::clone(&self.sequence)
    }

    /// Re-derive the sequence from the current paths and placements.
    ///
    /// Returns the new sequence if it replaced the old one. Empty results and
    /// results identical to the current sequence are not applied.
    pub fn recompute(&mut self, dreams: &[Dream]) -> Option<Arc<Vec<DreamId>>> {
        let computed = compute_sequence(&self.paths, dreams, &self.layout);
        self.apply_sequence(computed)
    }

    fn apply_sequence(&mut self, computed: Vec<DreamId>) -> Option<Arc<Vec<DreamId>>> {
        if computed.is_empty() || computed == *self.sequence {
            return None;
        }
        tracing::debug!(len = computed.len(), "stream sequence recomputed");
        self.sequence = Arc::new(computed);
        Some(Arc::clone(&self.sequence))
    }

    /// Clear every path and empty the sequence.
    pub fn reset_flow(&mut self) {
        tracing::info!(paths = self.paths.len(), "flow reset");
        self.paths = Arc::new(Vec::new());
        self.sequence = Arc::new(Vec::new());
        if self.gesture == Gesture::Connecting {
            self.gesture = Gesture::Idle;
        }
    }

    /// Pointer pressed at a screen-space point.
    pub fn on_gesture_start(&mut self, screen: Point, archive: &DreamArchive) -> Vec<BoardChange> {
        let world = self.camera.screen_to_world(screen);
        match self.mode {
            BoardMode::Connect => {
                Arc::make_mut(&mut self.paths).push(ConnectivityPath::starting_at(world));
                self.gesture = Gesture::Connecting;
                let mut changes = vec![BoardChange::Redraw];
                if let Some(seq) = self.recompute(archive.dreams()) {
                    changes.push(BoardChange::SequenceChanged(seq));
                }
                changes
            }
            BoardMode::Move => {
                self.gesture = match hit::topmost_tile(archive.dreams(), &self.layout, world) {
                    Some(id) => Gesture::DraggingTile { id, last_world: world },
                    None => Gesture::Panning { last_screen: screen },
                };
                Vec::new()
            }
        }
    }

    /// Pointer moved to a screen-space point.
    pub fn on_gesture_move(&mut self, screen: Point, archive: &mut DreamArchive) -> Vec<BoardChange> {
        let world = self.camera.screen_to_world(screen);
        match self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Panning { last_screen } => {
                self.camera.pan_by(screen.x - last_screen.x, screen.y - last_screen.y);
                self.gesture = Gesture::Panning { last_screen: screen };
                vec![BoardChange::Redraw]
            }
            Gesture::DraggingTile { id, last_world } => {
                self.gesture = Gesture::DraggingTile { id, last_world: world };
                let Some(current) = archive.get(&id).map(|d| d.placement) else {
                    self.gesture = Gesture::Idle;
                    return Vec::new();
                };
                let placement = Point::new(current.x + world.x - last_world.x, current.y + world.y - last_world.y);
                archive.reposition(&id, placement);
                let mut changes = vec![BoardChange::DreamMoved { id, placement }];
                if let Some(seq) = self.recompute(archive.dreams()) {
                    changes.push(BoardChange::SequenceChanged(seq));
                }
                changes
            }
            Gesture::Connecting => {
                if let Some(path) = Arc::make_mut(&mut self.paths).last_mut() {
                    path.push(world);
                }
                let mut changes = vec![BoardChange::Redraw];
                if let Some(seq) = self.recompute(archive.dreams()) {
                    changes.push(BoardChange::SequenceChanged(seq));
                }
                changes
            }
        }
    }

    /// Pointer released. The finished path stays on the board.
    pub fn on_gesture_end(&mut self) -> Vec<BoardChange> {
        let was = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match was {
            Gesture::Connecting => vec![BoardChange::Redraw],
            _ => Vec::new(),
        }
    }

    /// Zoom about the cursor. Positive `delta_y` zooms out.
    pub fn on_wheel(&mut self, screen: Point, delta_y: f64) -> Vec<BoardChange> {
        let factor = (-delta_y * 0.001).exp();
        self.camera.zoom_about(screen, factor);
        vec![BoardChange::Redraw]
    }
}
