//! Input model: views, named controls, and the draw-view gesture state.
//!
//! `UiState` holds the user's persistent choices (view, tool, ink, selected
//! overlay). `InputState` is the gesture being tracked between pointer-down
//! and pointer-up on the drawing canvas. Board gestures are tracked by
//! [`crate::board::Board`] itself.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::board::BoardMode;
use crate::camera::Point;
use crate::overlay::{OverlayId, ShapeKind};
use crate::stroke::{DEFAULT_INK, Tool};

/// Which surface is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// The drawing canvas.
    #[default]
    Draw,
    /// Archived dreams as movable tiles.
    Board,
    /// One dream at a time, in sequence.
    Stream,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A named control from the toolbar or keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Add the default frame, centred in the viewport.
    AddFrame,
    /// Add an overlay of the given shape at the viewport center.
    AddShape(ShapeKind),
    /// Advance the selected overlay's filter.
    CycleFilter,
    /// Archive the sketch as it stands, without animation.
    Capture,
    /// Spiral the whole sketch away, archive it, and clear the canvas.
    NewSheet,
    /// Pick an ink by palette name or CSS color.
    SelectInk(String),
    SelectTool(Tool),
    SetView(View),
    SetBoardMode(BoardMode),
    /// Remove every connectivity path and the sequence they produced.
    ResetFlow,
    /// Advance the stream by one dream.
    Next,
    TogglePlay,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub view: View,
    pub tool: Tool,
    /// CSS color for new strokes.
    pub ink: String,
    /// The overlay outlined as selected, if any.
    pub selected: Option<OverlayId>,
}

impl Default for UiState {
    fn default() -> Self {
        Self { view: View::Draw, tool: Tool::Pen, ink: DEFAULT_INK.to_owned(), selected: None }
    }
}

/// Gesture in progress on the drawing canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// Waiting for the next pointer-down.
    #[default]
    Idle,
    /// Laying down a freehand stroke.
    Drawing,
    /// Moving an overlay.
    DraggingOverlay {
        id: OverlayId,
        /// Canvas position of the previous pointer event.
        last: Point,
    },
    /// Pointer is down on the board; the board tracks the rest.
    Board,
    /// Pointer went down while consolidation was running and is ignored.
    Suppressed,
}

impl InputState {
    /// Whether a pointer is currently down.
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}
