use uuid::Uuid;

use super::*;
use crate::archive::DreamId;
use crate::glimpse::vignette_at;
use crate::overlay::FilterMode;

fn pen_stroke() -> Stroke {
    let mut stroke = Stroke::new(Point::new(0.0, 0.0), "#e53935", 5.0, Tool::Pen);
    stroke.push(Point::new(10.0, 10.0));
    stroke
}

fn dream_at(x: f64, y: f64) -> Dream {
    Dream {
        id: Uuid::new_v4(),
        strokes: Arc::new(vec![pen_stroke()]),
        overlays: Arc::new(Vec::new()),
        created_ms: 0,
        placement: Point::new(x, y),
    }
}

fn frame(filter: FilterMode) -> Overlay {
    Overlay { filter, ..Overlay::with_shape(Shape::Rect { width: 200.0, height: 100.0 }, 10.0, 20.0) }
}

fn children(cmd: &DrawCommand) -> &[DrawCommand] {
    match cmd {
        DrawCommand::Group { children, .. } => children,
        other => panic!("expected group, got {other:?}"),
    }
}

// =============================================================
// Primitives
// =============================================================

#[test]
fn pen_stroke_draws_over() {
    let DrawCommand::Polyline { points, tension, closed, style } = stroke_command(&pen_stroke()) else {
        panic!("expected polyline");
    };
    assert_eq!(points, vec![0.0, 0.0, 10.0, 10.0]);
    assert!((tension - 0.5).abs() < f64::EPSILON);
    assert!(!closed);
    assert_eq!(style.stroke.as_deref(), Some("#e53935"));
    assert_eq!(style.composite, CompositeOp::SourceOver);
}

#[test]
fn eraser_stroke_cuts_out() {
    let mut stroke = pen_stroke();
    stroke.tool = Tool::Eraser;
    let DrawCommand::Polyline { style, .. } = stroke_command(&stroke) else {
        panic!("expected polyline");
    };
    assert_eq!(style.composite, CompositeOp::DestinationOut);
    assert_eq!(style.composite.as_css(), "destination-out");
}

#[test]
fn normal_overlay_is_frame_only() {
    let cmd = overlay_command(&frame(FilterMode::Normal));
    let DrawCommand::Group { translate, .. } = &cmd else {
        panic!("expected group");
    };
    assert_eq!(*translate, Point::new(10.0, 20.0));
    let kids = children(&cmd);
    assert_eq!(kids.len(), 1);
    let DrawCommand::Rect { rect, style } = &kids[0] else {
        panic!("expected frame rect");
    };
    assert_eq!(*rect, Rect::new(0.0, 0.0, 200.0, 100.0));
    assert_eq!(style.stroke.as_deref(), Some("#000"));
    assert_eq!(style.fill, None);
}

#[test]
fn invert_overlay_has_lens_frame_and_label() {
    let cmd = overlay_command(&frame(FilterMode::Invert));
    let kids = children(&cmd);
    assert_eq!(kids.len(), 3);

    let DrawCommand::Rect { style: lens, .. } = &kids[0] else {
        panic!("expected lens");
    };
    assert_eq!(lens.fill.as_deref(), Some("#fff"));
    assert_eq!(lens.composite, CompositeOp::Difference);

    let DrawCommand::Rect { style: border, .. } = &kids[1] else {
        panic!("expected frame");
    };
    assert_eq!(border.stroke.as_deref(), Some("#fff"));

    let DrawCommand::Text { text, .. } = &kids[2] else {
        panic!("expected label");
    };
    assert_eq!(text, "?");
}

#[test]
fn emotion_lens_is_translucent() {
    let cmd = overlay_command(&frame(FilterMode::Emotion));
    let DrawCommand::Rect { style, .. } = &children(&cmd)[0] else {
        panic!("expected lens");
    };
    assert!((style.opacity - 0.5).abs() < f64::EPSILON);
    assert_eq!(style.composite, CompositeOp::Multiply);
}

#[test]
fn circle_label_sits_at_center() {
    let overlay = Overlay { filter: FilterMode::Interference, ..Overlay::with_shape(Shape::Circle { radius: 40.0 }, 0.0, 0.0) };
    let cmd = overlay_command(&overlay);
    let Some(DrawCommand::Text { at, .. }) = children(&cmd).last() else {
        panic!("expected label");
    };
    assert_eq!(*at, Point::new(40.0, 40.0));
}

#[test]
fn live_glimpse_draws_feed_and_vignette() {
    let glimpse = Glimpse::new(Rect::new(5.0, 6.0, 100.0, 50.0));
    let cmd = glimpse_command(&glimpse);
    let kids = children(&cmd);
    assert_eq!(kids[0], DrawCommand::Image { rect: Rect::new(0.0, 0.0, 100.0, 50.0), still: None });
    assert_eq!(kids[1], DrawCommand::Vignette { rect: Rect::new(0.0, 0.0, 100.0, 50.0), color: vignette_at(0) });
}

#[test]
fn commands_serialize_with_tag() {
    let value = serde_json::to_value(stroke_command(&pen_stroke())).unwrap();
    assert_eq!(value["cmd"], "polyline");
    assert_eq!(value["style"]["composite"], "source-over");
}

// =============================================================
// Views
// =============================================================

#[test]
fn sketch_scene_orders_strokes_overlays_selection() {
    let overlay = frame(FilterMode::Normal);
    let scene = sketch_scene(&[pen_stroke()], std::slice::from_ref(&overlay), Some(overlay.id));
    assert_eq!(scene.len(), 3);
    assert!(matches!(scene[0], DrawCommand::Polyline { .. }));
    assert!(matches!(scene[1], DrawCommand::Group { .. }));
    let DrawCommand::Rect { rect, style } = &scene[2] else {
        panic!("expected selection outline");
    };
    assert_eq!(*rect, overlay.bounding_box());
    assert_eq!(style.stroke.as_deref(), Some(SELECTION_COLOR));
}

#[test]
fn sketch_scene_ignores_stale_selection() {
    let scene = sketch_scene(&[pen_stroke()], &[], Some(Uuid::new_v4()));
    assert_eq!(scene.len(), 1);
}

#[test]
fn empty_board_shows_hint() {
    let scene = board_scene(&[], &TileLayout::default(), &Camera::default(), &[], &[], (800.0, 600.0));
    assert_eq!(scene.len(), 2);
    assert!(matches!(&scene[1], DrawCommand::Text { text, .. } if text.starts_with("Capture")));
}

#[test]
fn board_tiles_scale_and_badge_sequence() {
    let layout = TileLayout::default();
    let dreams = vec![dream_at(20.0, 20.0), dream_at(440.0, 20.0)];
    let sequence: Vec<DreamId> = vec![dreams[1].id];
    let camera = Camera { pan_x: 5.0, pan_y: 0.0, zoom: 2.0 };
    let scene = board_scene(&dreams, &layout, &camera, &[], &sequence, (1280.0, 800.0));

    assert_eq!(scene.len(), 2);
    let DrawCommand::Group { translate, scale, children: world, .. } = &scene[1] else {
        panic!("expected camera group");
    };
    assert_eq!(*translate, Point::new(5.0, 0.0));
    assert!((scale - 2.0).abs() < f64::EPSILON);

    // tile, tile, badge
    assert_eq!(world.len(), 3);
    let DrawCommand::Group { scale: tile_scale, .. } = &world[0] else {
        panic!("expected tile");
    };
    assert!((tile_scale - layout.scale()).abs() < f64::EPSILON);
    assert!(matches!(&world[2], DrawCommand::Text { text, .. } if text == "1"));
}

#[test]
fn board_draws_non_empty_paths() {
    let dreams = vec![dream_at(20.0, 20.0)];
    let paths = vec![ConnectivityPath::from_points(&[Point::new(0.0, 0.0), Point::new(50.0, 50.0)]), ConnectivityPath::default()];
    let scene = board_scene(&dreams, &TileLayout::default(), &Camera::default(), &paths, &[], (1280.0, 800.0));
    let world = children(&scene[1]);
    assert_eq!(world.len(), 2);
    assert!(matches!(&world[1], DrawCommand::Polyline { closed: false, .. }));
}

#[test]
fn stream_without_dream_shows_hint() {
    let scene = stream_scene(None, &StreamFrame { index: 0, len: 0, transition: None }, (800.0, 600.0));
    assert_eq!(scene.len(), 1);
}

#[test]
fn stream_counter_and_marker() {
    let dream = dream_at(0.0, 0.0);
    let settled = stream_scene(Some(&dream), &StreamFrame { index: 2, len: 5, transition: None }, (800.0, 600.0));
    assert!(matches!(settled.last(), Some(DrawCommand::Text { text, .. }) if text == "3 / 5"));

    let moving = stream_scene(Some(&dream), &StreamFrame { index: 2, len: 5, transition: Some(0.5) }, (800.0, 600.0));
    let Some(DrawCommand::Circle { center, style, .. }) = moving.last() else {
        panic!("expected marker");
    };
    assert!((center.x - 400.0).abs() < 1e-9);
    assert!((style.opacity - 1.0).abs() < 1e-9);
}
