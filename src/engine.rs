//! The engine core: one owner for every piece of sketch, archive, board and
//! stream state.
//!
//! The host feeds pointer events, named controls, and clock ticks in, and
//! gets [`Action`]s back. It draws whatever [`EngineCore::scene`] returns.
//! Input events carry no timestamp; an animation they start takes its start
//! time from the next tick. Archived dreams are stamped from a wall clock
//! that hosts can replace with [`EngineCore::with_wall_clock`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

use crate::archive::{self, DreamArchive, DreamId};
use crate::board::{Board, BoardChange, BoardMode};
use crate::camera::Point;
use crate::capture::{Closure, StrokeCapture};
use crate::config::{ConfigError, EngineConfig};
use crate::geom::Rect;
use crate::glimpse::{FrameSource, Glimpse};
use crate::hit;
use crate::input::{Button, Control, InputState, UiState, View};
use crate::overlay::{Overlay, OverlayId, ShapeKind, Transform};
use crate::render::{self, DrawCommand};
use crate::spiral::{Consolidated, SpiralAnimator, SpiralTick};
use crate::stream::{self, StreamEvent, StreamFrame, StreamPlayer};
use crate::stroke::{self, Sketch, Stroke, Tool};

/// Actions returned from input handlers and ticks for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    OverlayCreated(OverlayId),
    OverlayUpdated(OverlayId),
    /// A closed loop or new sheet started swirling into its center.
    ConsolidationStarted { center: Point },
    DreamCaptured(DreamId),
    DreamMoved { id: DreamId, placement: Point },
    SequenceChanged(Arc<Vec<DreamId>>),
    Stream(StreamEvent),
    GlimpseCaptured(Uuid),
}

fn request_render(actions: &mut Vec<Action>) {
    if !actions.contains(&Action::RenderNeeded) {
        actions.push(Action::RenderNeeded);
    }
}

fn board_actions(changes: Vec<BoardChange>) -> Vec<Action> {
    let mut actions = Vec::with_capacity(changes.len());
    for change in changes {
        match change {
            BoardChange::DreamMoved { id, placement } => {
                actions.push(Action::DreamMoved { id, placement });
                request_render(&mut actions);
            }
            BoardChange::SequenceChanged(seq) => actions.push(Action::SequenceChanged(seq)),
            BoardChange::Redraw => request_render(&mut actions),
        }
    }
    actions
}

/// All engine state, independent of any drawing substrate.
pub struct EngineCore {
    config: EngineConfig,
    sketch: Sketch,
    capture: StrokeCapture,
    spiral: SpiralAnimator,
    /// Display strokes for the running consolidation frame.
    spiral_strokes: Option<Vec<Stroke>>,
    archive: DreamArchive,
    board: Board,
    stream: StreamPlayer,
    glimpses: Arc<Vec<Glimpse>>,
    ui: UiState,
    input: InputState,
    rng: StdRng,
    /// Stamps `created_ms` on archived dreams.
    wall_clock: fn() -> i64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            config,
            sketch: Sketch::new(),
            capture: StrokeCapture::new(config.capture),
            spiral: SpiralAnimator::new(config.spiral.duration_ms),
            spiral_strokes: None,
            archive: DreamArchive::new(),
            board: Board::new(config.tile_layout()),
            stream: StreamPlayer::new(config.stream),
            glimpses: Arc::new(Vec::new()),
            ui: UiState::default(),
            input: InputState::Idle,
            rng,
            wall_clock: archive::now_ms,
        }
    }

    /// Replace the clock used to timestamp captures.
    #[must_use]
    pub fn with_wall_clock(mut self, clock: fn() -> i64) -> Self {
        self.wall_clock = clock;
        self
    }

    /// Build an engine from a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document is malformed or out of range.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        EngineConfig::from_json(raw).map(Self::new)
    }

    // --- Pointer input ---

    /// Pointer pressed at a canvas-space point.
    pub fn on_pointer_down(&mut self, p: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || self.input.is_active() {
            return Vec::new();
        }
        match self.ui.view {
            View::Draw => self.draw_pointer_down(p),
            View::Board => {
                self.input = InputState::Board;
                board_actions(self.board.on_gesture_start(p, &self.archive))
            }
            View::Stream => Vec::new(),
        }
    }

    fn draw_pointer_down(&mut self, p: Point) -> Vec<Action> {
        if self.spiral.is_running() {
            self.input = InputState::Suppressed;
            return Vec::new();
        }
        if let Some(id) = hit::overlay_at(self.sketch.overlays(), p) {
            self.ui.selected = Some(id);
            self.input = InputState::DraggingOverlay { id, last: p };
            return vec![Action::RenderNeeded];
        }
        self.ui.selected = None;
        self.capture.begin(&mut self.sketch, p, &self.ui.ink, self.ui.tool);
        self.input = InputState::Drawing;
        vec![Action::RenderNeeded]
    }

    /// Pointer moved to a canvas-space point.
    pub fn on_pointer_move(&mut self, p: Point) -> Vec<Action> {
        match self.input {
            InputState::Idle | InputState::Suppressed => Vec::new(),
            InputState::Drawing => {
                if self.capture.extend(&mut self.sketch, p) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            InputState::DraggingOverlay { id, last } => {
                self.input = InputState::DraggingOverlay { id, last: p };
                self.transform_overlay(&id, Transform::Translate { dx: p.x - last.x, dy: p.y - last.y })
            }
            InputState::Board => board_actions(self.board.on_gesture_move(p, &mut self.archive)),
        }
    }

    /// Pointer released. `end` is `None` when the pointer left the surface.
    pub fn on_pointer_up(&mut self, end: Option<Point>) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Suppressed | InputState::DraggingOverlay { .. } => Vec::new(),
            InputState::Drawing => match self.capture.finish(&self.sketch, end) {
                Closure::Closed { centroid } => self.begin_consolidation(centroid),
                Closure::Open | Closure::NoStroke => vec![Action::RenderNeeded],
            },
            InputState::Board => board_actions(self.board.on_gesture_end()),
        }
    }

    /// Double activation on the canvas cycles the filter of the overlay under the pointer.
    pub fn on_double_click(&mut self, p: Point) -> Vec<Action> {
        if self.ui.view != View::Draw {
            return Vec::new();
        }
        match hit::overlay_at(self.sketch.overlays(), p) {
            Some(id) => self.cycle_filter(&id),
            None => Vec::new(),
        }
    }

    /// Wheel over the board zooms about the cursor.
    pub fn on_wheel(&mut self, p: Point, delta_y: f64) -> Vec<Action> {
        if self.ui.view != View::Board {
            return Vec::new();
        }
        board_actions(self.board.on_wheel(p, delta_y))
    }

    // --- Controls ---

    pub fn on_control(&mut self, control: Control) -> Vec<Action> {
        match control {
            Control::AddFrame => {
                let frame = Overlay::centered_frame(self.config.viewport.width, self.config.viewport.height);
                self.add_overlay(frame)
            }
            Control::AddShape(kind) => self.add_shape(kind),
            Control::CycleFilter => match self.ui.selected {
                Some(id) => self.cycle_filter(&id),
                None => Vec::new(),
            },
            Control::Capture => self.capture_now(),
            Control::NewSheet => self.new_sheet(),
            Control::SelectInk(name) => self.select_ink(&name),
            Control::SelectTool(tool) => self.select_tool(tool),
            Control::SetView(view) => self.set_view(view),
            Control::SetBoardMode(mode) => self.set_board_mode(mode),
            Control::ResetFlow => self.reset_flow(),
            Control::Next => self.next(),
            Control::TogglePlay => {
                self.stream.toggle_play();
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn select_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.ui.tool = tool;
        Vec::new()
    }

    /// Select a palette ink by name, or any `#`-prefixed CSS color.
    pub fn select_ink(&mut self, name: &str) -> Vec<Action> {
        let hex = match stroke::ink_by_name(name) {
            Some(ink) => ink.hex.to_owned(),
            None if name.starts_with('#') => name.to_owned(),
            None => return Vec::new(),
        };
        self.ui.ink = hex;
        self.ui.tool = Tool::Pen;
        Vec::new()
    }

    /// Switch views. Leaving a view tears down the animation it owns.
    pub fn set_view(&mut self, view: View) -> Vec<Action> {
        if view == self.ui.view {
            return Vec::new();
        }
        match self.ui.view {
            View::Draw => {
                self.capture.cancel();
                if self.spiral.is_running() {
                    tracing::debug!("consolidation abandoned on view change");
                }
                self.spiral.cancel();
                self.spiral_strokes = None;
            }
            View::Stream => self.stream.reset(),
            View::Board => {}
        }
        if self.input == InputState::Board {
            self.board.on_gesture_end();
        }
        self.input = InputState::Idle;
        self.ui.view = view;

        let mut actions = Vec::new();
        if view == View::Stream {
            let len = self.effective_sequence().len();
            actions.extend(self.stream.sync(len).map(Action::Stream));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn set_board_mode(&mut self, mode: BoardMode) -> Vec<Action> {
        self.board.set_mode(mode);
        if self.input == InputState::Board {
            self.input = InputState::Idle;
        }
        Vec::new()
    }

    pub fn reset_flow(&mut self) -> Vec<Action> {
        self.board.reset_flow();
        vec![Action::SequenceChanged(self.board.sequence_snapshot()), Action::RenderNeeded]
    }

    /// Manually advance the stream. No-op outside the stream view.
    pub fn next(&mut self) -> Vec<Action> {
        if self.ui.view != View::Stream {
            return Vec::new();
        }
        let len = self.effective_sequence().len();
        match self.stream.next(len) {
            Some(event) => vec![Action::Stream(event), Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    // --- Overlays ---

    fn add_overlay(&mut self, overlay: Overlay) -> Vec<Action> {
        if self.spiral.is_running() {
            return Vec::new();
        }
        let id = overlay.id;
        self.sketch.push_overlay(overlay);
        self.ui.selected = Some(id);
        vec![Action::OverlayCreated(id), Action::RenderNeeded]
    }

    /// Add a fresh overlay of `kind` centred in the viewport.
    pub fn add_shape(&mut self, kind: ShapeKind) -> Vec<Action> {
        let half = crate::consts::OVERLAY_SIZE / 2.0;
        let x = self.config.viewport.width / 2.0 - half;
        let y = self.config.viewport.height / 2.0 - half;
        let overlay = Overlay::create(kind, x, y, &mut self.rng);
        self.add_overlay(overlay)
    }

    fn update_overlay(&mut self, next: Overlay) -> Vec<Action> {
        let id = next.id;
        if self.sketch.overlay(&id) == Some(&next) || !self.sketch.replace_overlay(next) {
            return Vec::new();
        }
        vec![Action::OverlayUpdated(id), Action::RenderNeeded]
    }

    /// Advance an overlay's filter. Unknown ids are ignored.
    pub fn cycle_filter(&mut self, id: &OverlayId) -> Vec<Action> {
        match self.sketch.overlay(id).map(Overlay::cycle_filter) {
            Some(next) => self.update_overlay(next),
            None => Vec::new(),
        }
    }

    /// Apply a geometric edit to an overlay. Rejected resizes emit nothing.
    pub fn transform_overlay(&mut self, id: &OverlayId, transform: Transform) -> Vec<Action> {
        match self.sketch.overlay(id).map(|o| o.apply_transform(transform)) {
            Some(next) => self.update_overlay(next),
            None => Vec::new(),
        }
    }

    // --- Glimpses ---

    /// Place a live camera glimpse on the canvas.
    pub fn add_glimpse(&mut self, rect: Rect) -> Uuid {
        let glimpse = Glimpse::new(rect);
        let id = glimpse.id;
        Arc::make_mut(&mut self.glimpses).push(glimpse);
        id
    }

    /// Freeze a glimpse on the source's current frame.
    pub fn capture_glimpse(&mut self, id: &Uuid, source: &mut dyn FrameSource) -> Vec<Action> {
        let Some(idx) = self.glimpses.iter().position(|g| &g.id == id) else {
            return Vec::new();
        };
        let Some(current) = self.glimpses.get(idx) else {
            return Vec::new();
        };
        let next = current.capture(source);
        if !next.is_captured() || current.is_captured() {
            return Vec::new();
        }
        if let Some(slot) = Arc::make_mut(&mut self.glimpses).get_mut(idx) {
            *slot = next;
        }
        vec![Action::GlimpseCaptured(*id), Action::RenderNeeded]
    }

    // --- Capture ---

    fn begin_consolidation(&mut self, center: Point) -> Vec<Action> {
        if !self.spiral.start(&self.sketch, center) {
            return vec![Action::RenderNeeded];
        }
        self.ui.selected = None;
        vec![Action::ConsolidationStarted { center }, Action::RenderNeeded]
    }

    /// Spiral every stroke into the sketch's centroid, then archive and clear.
    pub fn new_sheet(&mut self) -> Vec<Action> {
        if self.sketch.is_empty() || self.spiral.is_running() {
            return Vec::new();
        }
        let center = self.sketch.centroid().unwrap_or(Point::new(
            self.config.viewport.width / 2.0,
            self.config.viewport.height / 2.0,
        ));
        self.begin_consolidation(center)
    }

    /// Archive the sketch as it stands. The canvas is left untouched.
    pub fn capture_now(&mut self) -> Vec<Action> {
        if self.spiral.is_running() {
            return Vec::new();
        }
        let snapshot = Consolidated { strokes: self.sketch.stroke_snapshot(), overlays: self.sketch.overlay_snapshot() };
        self.archive_capture(snapshot)
    }

    fn archive_capture(&mut self, capture: Consolidated) -> Vec<Action> {
        let created_ms = (self.wall_clock)();
        let Some(id) = self.archive.append(capture.strokes, capture.overlays, created_ms, self.board.layout()) else {
            return Vec::new();
        };
        let mut actions = vec![Action::DreamCaptured(id)];
        if let Some(seq) = self.board.recompute(self.archive.dreams()) {
            actions.push(Action::SequenceChanged(seq));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Clock ---

    /// Advance every running animation to `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();

        match self.spiral.tick(now_ms) {
            SpiralTick::Idle => {}
            SpiralTick::Frame { strokes, .. } => {
                self.spiral_strokes = Some(strokes);
                request_render(&mut actions);
            }
            SpiralTick::Done(capture) => {
                self.spiral_strokes = None;
                actions.extend(self.archive_capture(capture));
                self.sketch.clear();
                self.glimpses = Arc::new(Vec::new());
                self.ui.selected = None;
                request_render(&mut actions);
            }
        }

        if self.ui.view == View::Draw && self.glimpses.iter().any(|g| !g.is_captured()) {
            self.glimpses = Arc::new(self.glimpses.iter().map(Glimpse::advanced).collect());
            request_render(&mut actions);
        }

        if self.ui.view == View::Stream {
            let len = self.effective_sequence().len();
            let events = self.stream.tick(len, now_ms);
            let transitioning = self.stream.frame(len).is_some_and(|f| f.transition.is_some());
            if !events.is_empty() || transitioning {
                actions.extend(events.into_iter().map(Action::Stream));
                request_render(&mut actions);
            }
        }
        actions
    }

    // --- Scene ---

    /// Draw commands for the current view.
    #[must_use]
    pub fn scene(&self) -> Vec<DrawCommand> {
        let viewport = (self.config.viewport.width, self.config.viewport.height);
        match self.ui.view {
            View::Draw => {
                let strokes = self.spiral_strokes.as_deref().unwrap_or(self.sketch.strokes());
                let mut out = render::sketch_scene(strokes, self.sketch.overlays(), self.ui.selected);
                out.extend(self.glimpses.iter().map(render::glimpse_command));
                out
            }
            View::Board => render::board_scene(
                self.archive.dreams(),
                self.board.layout(),
                &self.board.camera,
                self.board.paths(),
                self.board.sequence(),
                viewport,
            ),
            View::Stream => {
                let sequence = self.effective_sequence();
                let frame = self.stream.frame(sequence.len()).unwrap_or(StreamFrame {
                    index: 0,
                    len: sequence.len(),
                    transition: None,
                });
                let dream = sequence.get(frame.index).and_then(|id| self.archive.get(id));
                render::stream_scene(dream, &frame, viewport)
            }
        }
    }

    // --- Queries ---

    /// Ids the stream walks: the board sequence, or archive order if none.
    #[must_use]
    pub fn effective_sequence(&self) -> Vec<DreamId> {
        stream::effective_sequence(self.board.sequence(), &self.archive)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }

    #[must_use]
    pub fn archive(&self) -> &DreamArchive {
        &self.archive
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stream(&self) -> &StreamPlayer {
        &self.stream
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    #[must_use]
    pub fn glimpses(&self) -> &[Glimpse] {
        &self.glimpses
    }

    #[must_use]
    pub fn is_consolidating(&self) -> bool {
        self.spiral.is_running()
    }

    #[must_use]
    pub fn spiral_progress(&self) -> Option<f64> {
        self.spiral.progress()
    }

    /// Strokes as currently displayed, spiral frame included.
    #[must_use]
    pub fn display_strokes(&self) -> &[Stroke] {
        self.spiral_strokes.as_deref().unwrap_or(self.sketch.strokes())
    }
}
