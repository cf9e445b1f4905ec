//! Rendering: turns engine state into draw commands for the host canvas.
//!
//! This module never touches a drawing context. It receives read-only views
//! of sketch, board, and stream state and produces a retained list of
//! [`DrawCommand`]s, which the host replays onto whatever 2D substrate it
//! owns. Nothing here mutates application state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;
use std::sync::Arc;

use serde::Serialize;

use crate::archive::Dream;
use crate::board::{ConnectivityPath, TileLayout};
use crate::camera::{Camera, Point};
use crate::consts::{OVERLAY_LABEL_SIZE, STROKE_TENSION};
use crate::geom::Rect;
use crate::glimpse::{Glimpse, GlimpseState, StillImage};
use crate::overlay::{Overlay, OverlayId, Shape};
use crate::stream::StreamFrame;
use crate::stroke::{Stroke, Tool};

/// Board background color.
const BOARD_BACKGROUND: &str = "#fdfaf6";
/// Tile frame border color.
const TILE_BORDER: &str = "#e0e0e0";
/// Tile border width in screen pixels, independent of tile scale.
const TILE_BORDER_PX: f64 = 5.0;
/// Selection outline color.
const SELECTION_COLOR: &str = "#1E90FF";
/// Connectivity pen color and width.
const PATH_COLOR: &str = "#8e24aa";
const PATH_WIDTH: f64 = 4.0;
/// Muted text color for hints and counters.
const HINT_COLOR: &str = "#aaa";
/// Traveling transition marker radius.
const MARKER_RADIUS: f64 = 12.0;

/// Compositing operation for a draw command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeOp {
    #[default]
    SourceOver,
    DestinationOut,
    Difference,
    Multiply,
    Exclusion,
}

impl CompositeOp {
    /// The canvas `globalCompositeOperation` name.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::DestinationOut => "destination-out",
            Self::Difference => "difference",
            Self::Multiply => "multiply",
            Self::Exclusion => "exclusion",
        }
    }
}

/// Paint settings shared by every primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub line_width: f64,
    pub opacity: f64,
    pub composite: CompositeOp,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: None, stroke: None, line_width: 1.0, opacity: 1.0, composite: CompositeOp::SourceOver }
    }
}

impl Style {
    #[must_use]
    pub fn stroked(color: &str, line_width: f64) -> Self {
        Self { stroke: Some(color.to_owned()), line_width, ..Self::default() }
    }

    #[must_use]
    pub fn filled(color: &str) -> Self {
        Self { fill: Some(color.to_owned()), ..Self::default() }
    }
}

/// One node of the retained scene handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Child commands drawn under a translate → rotate → scale transform.
    Group { translate: Point, rotation_deg: f64, scale: f64, children: Vec<DrawCommand> },
    /// Smoothed polyline through flattened points, round caps and joins.
    Polyline { points: Vec<f64>, tension: f64, closed: bool, style: Style },
    Rect { rect: Rect, style: Style },
    Circle { center: Point, radius: f64, style: Style },
    Text { text: String, at: Point, size: f64, color: String, opacity: f64 },
    /// Radial gradient from transparent at the center to `color` at the rim.
    Vignette { rect: Rect, color: String },
    /// A live camera feed (`still == None`) or a frozen capture.
    #[serde(skip_serializing)]
    Image { rect: Rect, still: Option<Arc<StillImage>> },
}

// =============================================================
// Primitives
// =============================================================

/// A freehand stroke. Eraser strokes composite destructively.
#[must_use]
pub fn stroke_command(stroke: &Stroke) -> DrawCommand {
    let composite = match stroke.tool {
        Tool::Pen => CompositeOp::SourceOver,
        Tool::Eraser => CompositeOp::DestinationOut,
    };
    DrawCommand::Polyline {
        points: stroke.points.clone(),
        tension: STROKE_TENSION,
        closed: false,
        style: Style { composite, ..Style::stroked(&stroke.color, stroke.width) },
    }
}

/// A shape in its local coordinates with the given style.
#[must_use]
pub fn shape_command(shape: &Shape, style: Style) -> DrawCommand {
    match shape {
        Shape::Rect { width, height } => DrawCommand::Rect { rect: Rect::new(0.0, 0.0, *width, *height), style },
        Shape::Circle { radius } => DrawCommand::Circle { center: Point::new(*radius, *radius), radius: *radius, style },
        Shape::Polygon { points } => DrawCommand::Polyline { points: points.clone(), tension: 0.0, closed: true, style },
        Shape::Spline { points, tension, closed } => {
            DrawCommand::Polyline { points: points.clone(), tension: *tension, closed: *closed, style }
        }
    }
}

/// An overlay: optional lens layer, frame layer, and filter label.
#[must_use]
pub fn overlay_command(overlay: &Overlay) -> DrawCommand {
    let filter = overlay.filter.spec();
    let mut children = Vec::with_capacity(3);

    if overlay.filter.has_lens() {
        let lens = Style {
            fill: Some(filter.fill.to_owned()),
            opacity: filter.lens_opacity,
            composite: filter.op,
            ..Style::default()
        };
        children.push(shape_command(&overlay.shape, lens));
    }

    let frame_color = if overlay.filter.has_lens() { filter.stroke } else { overlay.stroke.as_str() };
    children.push(shape_command(&overlay.shape, Style::stroked(frame_color, overlay.stroke_width)));

    if !filter.label.is_empty() {
        let at = match overlay.shape {
            Shape::Circle { radius } => Point::new(radius, radius),
            _ => Point::new(5.0, 5.0),
        };
        children.push(DrawCommand::Text {
            text: filter.label.to_owned(),
            at,
            size: OVERLAY_LABEL_SIZE,
            color: filter.stroke.to_owned(),
            opacity: 0.8,
        });
    }

    DrawCommand::Group { translate: overlay.origin(), rotation_deg: overlay.rotation, scale: 1.0, children }
}

/// A camera-backed glimpse: feed or still, topped with its vignette.
#[must_use]
pub fn glimpse_command(glimpse: &Glimpse) -> DrawCommand {
    let local = Rect::new(0.0, 0.0, glimpse.rect.width, glimpse.rect.height);
    let (still, vignette) = match &glimpse.state {
        GlimpseState::Live { .. } => (None, glimpse.vignette_color()),
        GlimpseState::Captured { still, vignette } => (Some(Arc::clone(still)), vignette.clone()),
    };
    DrawCommand::Group {
        translate: Point::new(glimpse.rect.x, glimpse.rect.y),
        rotation_deg: 0.0,
        scale: 1.0,
        children: vec![DrawCommand::Image { rect: local, still }, DrawCommand::Vignette { rect: local, color: vignette }],
    }
}

// =============================================================
// Views
// =============================================================

/// Draw view: strokes, then overlays, then the selection outline.
#[must_use]
pub fn sketch_scene(strokes: &[Stroke], overlays: &[Overlay], selected: Option<OverlayId>) -> Vec<DrawCommand> {
    let mut out: Vec<DrawCommand> = strokes.iter().map(stroke_command).collect();
    out.extend(overlays.iter().map(overlay_command));

    if let Some(sel) = selected.and_then(|id| overlays.iter().find(|o| o.id == id)) {
        out.push(DrawCommand::Rect { rect: sel.bounding_box(), style: Style::stroked(SELECTION_COLOR, 1.0) });
    }
    out
}

/// Strokes and overlays of one dream, in its own canvas coordinates.
fn dream_content(dream: &Dream) -> Vec<DrawCommand> {
    dream
        .strokes
        .iter()
        .map(stroke_command)
        .chain(dream.overlays.iter().map(overlay_command))
        .collect()
}

/// Board view: background, tiles at their placements, pen paths, and the
/// order badge of each sequenced dream. Everything but the background sits
/// under the camera transform.
#[must_use]
pub fn board_scene(
    dreams: &[Dream],
    layout: &TileLayout,
    camera: &Camera,
    paths: &[ConnectivityPath],
    sequence: &[crate::archive::DreamId],
    viewport: (f64, f64),
) -> Vec<DrawCommand> {
    let (vw, vh) = viewport;
    let mut out = vec![DrawCommand::Rect { rect: Rect::new(0.0, 0.0, vw, vh), style: Style::filled(BOARD_BACKGROUND) }];

    if dreams.is_empty() {
        out.push(DrawCommand::Text {
            text: "Capture your dreams to see them here.".to_owned(),
            at: Point::new(vw / 2.0 - 150.0, vh / 2.0),
            size: 20.0,
            color: HINT_COLOR.to_owned(),
            opacity: 1.0,
        });
        return out;
    }

    let mut world = Vec::with_capacity(dreams.len() + paths.len());
    for dream in dreams {
        let scale = layout.scale();
        let mut children = vec![DrawCommand::Rect {
            rect: Rect::new(0.0, 0.0, layout.source_width, layout.source_height),
            style: Style { fill: Some("#fff".to_owned()), ..Style::stroked(TILE_BORDER, TILE_BORDER_PX / scale) },
        }];
        children.extend(dream_content(dream));
        world.push(DrawCommand::Group { translate: dream.placement, rotation_deg: 0.0, scale, children });

        if let Some(pos) = sequence.iter().position(|id| *id == dream.id) {
            world.push(DrawCommand::Text {
                text: (pos + 1).to_string(),
                at: Point::new(dream.placement.x + 8.0, dream.placement.y + 8.0),
                size: 16.0,
                color: PATH_COLOR.to_owned(),
                opacity: 1.0,
            });
        }
    }
    for path in paths.iter().filter(|p| !p.is_empty()) {
        world.push(DrawCommand::Polyline {
            points: path.points().to_vec(),
            tension: STROKE_TENSION,
            closed: false,
            style: Style { opacity: 0.7, ..Style::stroked(PATH_COLOR, PATH_WIDTH / camera.zoom) },
        });
    }

    out.push(DrawCommand::Group {
        translate: Point::new(camera.pan_x, camera.pan_y),
        rotation_deg: 0.0,
        scale: camera.zoom,
        children: world,
    });
    out
}

/// Stream view: the displayed dream, its counter, and the transition marker.
#[must_use]
pub fn stream_scene(dream: Option<&Dream>, frame: &StreamFrame, viewport: (f64, f64)) -> Vec<DrawCommand> {
    let (vw, vh) = viewport;
    let Some(dream) = dream else {
        return vec![DrawCommand::Text {
            text: "No dreams to stream yet.".to_owned(),
            at: Point::new(vw / 2.0 - 100.0, vh / 2.0),
            size: 20.0,
            color: HINT_COLOR.to_owned(),
            opacity: 1.0,
        }];
    };

    let mut out = dream_content(dream);
    out.push(DrawCommand::Text {
        text: format!("{} / {}", frame.index + 1, frame.len),
        at: Point::new(20.0, vh - 40.0),
        size: 16.0,
        color: HINT_COLOR.to_owned(),
        opacity: 1.0,
    });

    if let Some(progress) = frame.transition {
        // Marker sweeps from off-screen left to off-screen right, brightest mid-frame.
        let x = (vw + MARKER_RADIUS * 4.0).mul_add(progress, -MARKER_RADIUS * 2.0);
        out.push(DrawCommand::Circle {
            center: Point::new(x, vh / 2.0),
            radius: MARKER_RADIUS,
            style: Style { opacity: (progress * PI).sin(), ..Style::filled(PATH_COLOR) },
        });
    }
    out
}
