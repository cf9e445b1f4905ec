//! Spiral consolidation: the animation that swirls a closed sketch into its
//! center before it is archived.
//!
//! The animation is a pure function of progress ([`spiral_frame`]). The
//! [`SpiralAnimator`] only turns host clock readings into monotonic progress
//! and keeps the untouched source sketch, which is what gets archived when
//! the run completes. A run's clock starts on its first tick, not when it is
//! requested.

#[cfg(test)]
#[path = "spiral_test.rs"]
mod spiral_test;

use std::sync::Arc;

use crate::camera::Point;
use crate::consts::SPIRAL_DURATION_MS;
use crate::geom;
use crate::overlay::Overlay;
use crate::stroke::{Sketch, Stroke};

/// Display copy of `strokes` at `progress` ∈ [0, 1] around `center`.
#[must_use]
pub fn spiral_frame(strokes: &[Stroke], center: Point, progress: f64) -> Vec<Stroke> {
    strokes
        .iter()
        .map(|s| s.map_points(|p| geom::spiral_point(p, center, progress)))
        .collect()
}

/// The pre-animation sketch, handed back when a run completes.
#[derive(Debug, Clone)]
pub struct Consolidated {
    pub strokes: Arc<Vec<Stroke>>,
    pub overlays: Arc<Vec<Overlay>>,
}

/// Result of advancing the animator.
#[derive(Debug, Clone)]
pub enum SpiralTick {
    /// No run in progress.
    Idle,
    /// Mid-run display frame.
    Frame { progress: f64, strokes: Vec<Stroke> },
    /// The run finished; the source sketch is ready to archive.
    Done(Consolidated),
}

#[derive(Debug, Clone)]
struct SpiralRun {
    source: Consolidated,
    center: Point,
    /// Latched by the first tick after `start`.
    started_ms: Option<f64>,
    progress: f64,
}

/// Drives one consolidation at a time.
#[derive(Debug, Clone)]
pub struct SpiralAnimator {
    duration_ms: f64,
    run: Option<SpiralRun>,
}

impl Default for SpiralAnimator {
    fn default() -> Self {
        Self::new(SPIRAL_DURATION_MS)
    }
}

impl SpiralAnimator {
    #[must_use]
    pub fn new(duration_ms: f64) -> Self {
        Self { duration_ms, run: None }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Progress of the current run, if any.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.run.as_ref().map(|r| r.progress)
    }

    /// Begin consolidating `sketch` around `center`.
    ///
    /// The sketch is snapshotted as it stands now. Returns false, leaving the
    /// current run untouched, if a run is already in progress.
    pub fn start(&mut self, sketch: &Sketch, center: Point) -> bool {
        if self.run.is_some() {
            return false;
        }
        tracing::debug!(strokes = sketch.strokes().len(), x = center.x, y = center.y, "consolidation started");
        self.run = Some(SpiralRun {
            source: Consolidated { strokes: sketch.stroke_snapshot(), overlays: sketch.overlay_snapshot() },
            center,
            started_ms: None,
            progress: 0.0,
        });
        true
    }

    /// Advance to `now_ms`.
    ///
    /// Progress never decreases within a run, even if the clock steps back.
    pub fn tick(&mut self, now_ms: f64) -> SpiralTick {
        let Some(run) = self.run.as_mut() else {
            return SpiralTick::Idle;
        };

        let started_ms = *run.started_ms.get_or_insert(now_ms);
        let raw = if self.duration_ms > 0.0 { (now_ms - started_ms) / self.duration_ms } else { 1.0 };
        run.progress = run.progress.max(raw.clamp(0.0, 1.0));

        if run.progress < 1.0 {
            return SpiralTick::Frame {
                progress: run.progress,
                strokes: spiral_frame(&run.source.strokes, run.center, run.progress),
            };
        }

        match self.run.take() {
            Some(done) => {
                tracing::debug!(strokes = done.source.strokes.len(), "consolidation finished");
                SpiralTick::Done(done.source)
            }
            None => SpiralTick::Idle,
        }
    }

    /// Abandon the current run without producing a capture.
    pub fn cancel(&mut self) {
        self.run = None;
    }
}
