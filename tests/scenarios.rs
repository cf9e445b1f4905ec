//! End-to-end scenarios driven through the public engine surface only.

use std::f64::consts::TAU;

use dreamboard::archive::DreamId;
use dreamboard::board::BoardMode;
use dreamboard::camera::Point;
use dreamboard::config::EngineConfig;
use dreamboard::engine::{Action, EngineCore};
use dreamboard::input::{Button, Control, View};
use dreamboard::overlay::ShapeKind;
use dreamboard::render::DrawCommand;
use dreamboard::stream::{PlaybackState, StreamEvent};

/// An engine plus the host's frame clock.
struct Host {
    engine: EngineCore,
    now: f64,
}

impl Host {
    fn new(config: EngineConfig) -> Self {
        Self { engine: EngineCore::new(config), now: 0.0 }
    }

    /// Advance the clock in 16 ms frames, collecting every action.
    fn run_for(&mut self, ms: f64) -> Vec<Action> {
        let end = self.now + ms;
        let mut actions = Vec::new();
        while self.now < end {
            self.now = (self.now + 16.0).min(end);
            actions.extend(self.engine.tick(self.now));
        }
        actions
    }

    fn stroke(&mut self, points: &[Point], end: Option<Point>) -> Vec<Action> {
        let mut actions = self.engine.on_pointer_down(points[0], Button::Primary);
        for p in &points[1..] {
            actions.extend(self.engine.on_pointer_move(*p));
        }
        actions.extend(self.engine.on_pointer_up(end));
        actions
    }

    fn drag(&mut self, from: Point, to: Point) -> Vec<Action> {
        self.stroke(&[from, to], Some(to))
    }

    /// Draw a closed loop of `n` points and let the spiral finish.
    fn capture_loop(&mut self, center: Point, n: usize) -> DreamId {
        let points = ring(center, 80.0, n);
        let end = Point::new(points[0].x - 3.0, points[0].y + 4.0);
        let started = self.stroke(&points, Some(end));
        assert!(started.iter().any(|a| matches!(a, Action::ConsolidationStarted { .. })), "{started:?}");
        self.run_for(1000.0)
            .into_iter()
            .find_map(|a| match a {
                Action::DreamCaptured(id) => Some(id),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no dream captured"))
    }
}

fn ring(center: Point, radius: f64, n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let a = TAU * i as f64 / n as f64;
            Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

/// Viewport sized so board tiles are exactly 200 × 150.
fn small_board() -> EngineConfig {
    let mut config = EngineConfig { seed: Some(5), ..EngineConfig::default() };
    config.viewport.width = 680.0;
    config.viewport.height = 510.0;
    config
}

#[test]
fn thirty_point_loop_becomes_a_dream() {
    let mut host = Host::new(EngineConfig::default());
    let id = host.capture_loop(Point::new(300.0, 300.0), 30);

    let engine = &host.engine;
    assert!(engine.sketch().is_empty());
    assert!(!engine.is_consolidating());
    assert_eq!(engine.archive().len(), 1);

    let dream = engine.archive().get(&id).unwrap();
    assert_eq!(dream.strokes.len(), 1);
    assert_eq!(dream.strokes[0].point_count(), 30);
    // Archived geometry is the drawing as made, not the collapsed spiral.
    assert!((dream.strokes[0].points[0] - 380.0).abs() < 1e-9);
    assert_eq!(dream.placement, Point::new(20.0, 20.0));
}

#[test]
fn short_scribble_never_consolidates() {
    let mut host = Host::new(EngineConfig::default());
    let points = ring(Point::new(300.0, 300.0), 80.0, 15);
    let actions = host.stroke(&points, Some(points[0]));
    assert!(!actions.iter().any(|a| matches!(a, Action::ConsolidationStarted { .. })));
    host.run_for(2000.0);
    assert!(host.engine.archive().is_empty());
    assert_eq!(host.engine.sketch().strokes().len(), 1);
}

#[test]
fn connected_tiles_stream_in_pen_order() {
    let mut host = Host::new(small_board());
    let a = host.capture_loop(Point::new(200.0, 200.0), 30);
    let b = host.capture_loop(Point::new(400.0, 200.0), 30);

    host.engine.set_view(View::Board);
    // Grid slots are (20, 20) and (240, 20); line them up at (0, 0) and (300, 0).
    host.drag(Point::new(100.0, 100.0), Point::new(80.0, 80.0));
    host.drag(Point::new(300.0, 100.0), Point::new(360.0, 80.0));
    assert_eq!(host.engine.archive().get(&a).unwrap().placement, Point::new(0.0, 0.0));
    assert_eq!(host.engine.archive().get(&b).unwrap().placement, Point::new(300.0, 0.0));

    host.engine.on_control(Control::SetBoardMode(BoardMode::Connect));
    let actions = host.stroke(
        &[Point::new(400.0, 50.0), Point::new(250.0, 50.0), Point::new(100.0, 50.0), Point::new(400.0, 60.0)],
        None,
    );
    assert!(actions.iter().any(|a| matches!(a, Action::SequenceChanged(_))));
    assert_eq!(host.engine.board().sequence(), &[b, a]);

    host.engine.on_control(Control::SetView(View::Stream));
    assert_eq!(host.engine.stream().displayed_index(), Some(0));
    assert_eq!(host.engine.effective_sequence()[0], b);

    // Dwell, then a transition whose midpoint swaps to `a`.
    let actions = host.run_for(2000.0 + 600.0);
    assert!(actions.contains(&Action::Stream(StreamEvent::TransitionStarted { from: 0, to: 1 })));
    assert!(actions.contains(&Action::Stream(StreamEvent::Swapped { index: 1 })));
    assert_eq!(host.engine.stream().displayed_index(), Some(1));

    host.run_for(500.0);
    assert!(matches!(host.engine.stream().state(), PlaybackState::Showing { index: 1, .. }));
}

#[test]
fn reset_flow_falls_back_to_capture_order() {
    let mut host = Host::new(small_board());
    let a = host.capture_loop(Point::new(200.0, 200.0), 20);
    let b = host.capture_loop(Point::new(400.0, 200.0), 20);

    host.engine.set_view(View::Board);
    host.engine.set_board_mode(BoardMode::Connect);
    host.stroke(&[Point::new(300.0, 100.0)], None);
    assert_eq!(host.engine.effective_sequence(), vec![b]);

    host.engine.on_control(Control::ResetFlow);
    assert_eq!(host.engine.effective_sequence(), vec![a, b]);
}

#[test]
fn paused_stream_advances_only_on_next() {
    let mut host = Host::new(EngineConfig::default());
    for x in [150.0, 350.0, 550.0] {
        host.capture_loop(Point::new(x, 300.0), 25);
    }
    host.engine.on_control(Control::TogglePlay);
    host.engine.set_view(View::Stream);

    host.run_for(10_000.0);
    assert_eq!(host.engine.stream().displayed_index(), Some(0));

    for expected in [1, 2, 0] {
        host.engine.on_control(Control::Next);
        host.run_for(1100.0);
        assert_eq!(host.engine.stream().displayed_index(), Some(expected));
    }
}

#[test]
fn frames_and_filters_travel_with_the_dream() {
    let mut host = Host::new(EngineConfig { seed: Some(9), ..EngineConfig::default() });
    host.engine.on_control(Control::AddShape(ShapeKind::Polygon));
    host.engine.on_control(Control::CycleFilter);
    host.engine.on_control(Control::CycleFilter);

    let id = host.capture_loop(Point::new(200.0, 200.0), 30);
    let dream = host.engine.archive().get(&id).unwrap();
    assert_eq!(dream.overlays.len(), 1);
    assert_eq!(dream.overlays[0].filter.spec().name, "emotion");

    host.engine.set_view(View::Stream);
    let scene = host.engine.scene();
    let labelled = scene.iter().any(|cmd| match cmd {
        DrawCommand::Group { children, .. } => {
            children.iter().any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "\u{2665}"))
        }
        _ => false,
    });
    assert!(labelled, "stream scene should carry the overlay label");
}

#[test]
fn config_from_json_tunes_closure() {
    let engine = EngineCore::from_json(r#"{ "capture": { "min_points": 5, "closure_radius": 10 } }"#).unwrap();
    let mut host = Host { engine, now: 0.0 };
    let points = ring(Point::new(300.0, 300.0), 50.0, 8);
    let near = Point::new(points[0].x, points[0].y + 9.0);
    let actions = host.stroke(&points, Some(near));
    assert!(actions.iter().any(|a| matches!(a, Action::ConsolidationStarted { .. })));
}
