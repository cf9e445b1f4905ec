//! Glimpses: camera-backed frames on the drawing canvas.
//!
//! A glimpse shows a live feed under an oscillating vignette until the user
//! captures it, at which point it freezes the still and the vignette color
//! into an immutable [`GlimpseState::Captured`]. The camera itself lives
//! behind [`FrameSource`]; a failing source is logged and the glimpse stays
//! live.

#[cfg(test)]
#[path = "glimpse_test.rs"]
mod glimpse_test;

use std::sync::Arc;

use uuid::Uuid;

use crate::geom::Rect;

/// Error raised by a [`FrameSource`].
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// No camera is attached or the feed has not started yet.
    #[error("no camera feed available")]
    Unavailable,
    /// The user or platform refused camera access.
    #[error("camera access denied")]
    PermissionDenied,
    /// The device reported an error while grabbing a frame.
    #[error("camera device error: {0}")]
    Device(String),
}

/// A frozen camera frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillImage {
    pub width: u32,
    pub height: u32,
    /// Encoded image, e.g. a `data:image/png;base64,...` URL.
    pub data_url: String,
}

/// Supplies stills from a live camera feed.
pub trait FrameSource {
    /// Grab the current frame scaled to `width` × `height`.
    ///
    /// # Errors
    ///
    /// Returns a [`CaptureError`] if the feed is unavailable or the device fails.
    fn grab_still(&mut self, width: u32, height: u32) -> Result<StillImage, CaptureError>;

    /// Release the feed. Called once a glimpse has captured.
    fn stop(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum GlimpseState {
    /// Showing the live feed; `frame` drives the vignette oscillation.
    Live { frame: u64 },
    /// Frozen.
    Captured { still: Arc<StillImage>, vignette: String },
}

/// Vignette color of a live glimpse at animation frame `frame`.
///
/// Hue drifts between warm white and soft blue; alpha breathes between 0.1
/// and 0.5 on a slower cycle.
#[must_use]
pub fn vignette_at(frame: u64) -> String {
    let f = frame as f64;
    let t = ((f * 0.05).sin() + 1.0) / 2.0;
    let lerp = |a: f64, b: f64| a.mul_add(1.0 - t, b * t).floor();
    let alpha = 0.2f64.mul_add((f * 0.02).sin(), 0.3);
    format!("rgba({}, {}, {}, {alpha})", lerp(255.0, 200.0), lerp(250.0, 220.0), lerp(240.0, 255.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Glimpse {
    pub id: Uuid,
    pub rect: Rect,
    pub state: GlimpseState,
}

impl Glimpse {
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self { id: Uuid::new_v4(), rect, state: GlimpseState::Live { frame: 0 } }
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        matches!(self.state, GlimpseState::Captured { .. })
    }

    /// Current vignette color: oscillating while live, frozen once captured.
    #[must_use]
    pub fn vignette_color(&self) -> String {
        match &self.state {
            GlimpseState::Live { frame } => vignette_at(*frame),
            GlimpseState::Captured { vignette, .. } => vignette.clone(),
        }
    }

    /// Copy advanced by one animation frame. Captured glimpses do not change.
    #[must_use]
    pub fn advanced(&self) -> Self {
        match self.state {
            GlimpseState::Live { frame } => Self { state: GlimpseState::Live { frame: frame + 1 }, ..self.clone() },
            GlimpseState::Captured { .. } => self.clone(),
        }
    }

    /// Copy frozen on the source's current frame.
    ///
    /// Already-captured glimpses are returned unchanged. If the source fails
    /// the error is logged and the glimpse stays live.
    pub fn capture(&self, source: &mut dyn FrameSource) -> Self {
        if self.is_captured() {
            return self.clone();
        }
        let (w, h) = (self.rect.width.max(1.0) as u32, self.rect.height.max(1.0) as u32);
        match source.grab_still(w, h) {
            Ok(still) => {
                source.stop();
                tracing::debug!(glimpse_id = %self.id, "glimpse captured");
                Self {
                    state: GlimpseState::Captured { still: Arc::new(still), vignette: self.vignette_color() },
                    ..self.clone()
                }
            }
            Err(e) => {
                tracing::warn!(glimpse_id = %self.id, error = %e, "glimpse capture failed");
                self.clone()
            }
        }
    }
}
