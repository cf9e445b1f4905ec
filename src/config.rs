//! Engine configuration.
//!
//! Every section is optional in JSON; absent fields fall back to the
//! defaults in [`crate::consts`]. [`EngineConfig::from_json`] parses and
//! validates in one step.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::board::TileLayout;
use crate::capture::CaptureConfig;
use crate::consts::{
    BOARD_COLS, BOARD_MARGIN, SPIRAL_DURATION_MS, TILE_HIT_TOLERANCE, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
use crate::stream::StreamConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralConfig {
    pub duration_ms: f64,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self { duration_ms: SPIRAL_DURATION_MS }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub cols: usize,
    pub margin: f64,
    pub hit_tolerance: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self { cols: BOARD_COLS, margin: BOARD_MARGIN, hit_tolerance: TILE_HIT_TOLERANCE }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { width: VIEWPORT_WIDTH, height: VIEWPORT_HEIGHT }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub capture: CaptureConfig,
    pub spiral: SpiralConfig,
    pub board: BoardConfig,
    pub stream: StreamConfig,
    pub viewport: ViewportConfig,
    /// Seed for shape randomization. Unseeded engines draw from OS entropy.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Parse a JSON document and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate().inspect_err(|e| tracing::warn!(error = %e, "rejected engine config"))?;
        Ok(config)
    }

    /// Check every value the engine relies on being in range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Invalid`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("capture.closure_radius", self.capture.closure_radius)?;
        positive("capture.stroke_width", self.capture.stroke_width)?;
        non_negative("spiral.duration_ms", self.spiral.duration_ms)?;
        if self.board.cols == 0 {
            return Err(invalid("board.cols", "must be at least 1"));
        }
        non_negative("board.margin", self.board.margin)?;
        non_negative("board.hit_tolerance", self.board.hit_tolerance)?;
        non_negative("stream.dwell_ms", self.stream.dwell_ms)?;
        non_negative("stream.transition_ms", self.stream.transition_ms)?;
        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;
        Ok(())
    }

    /// Board tile geometry for this viewport.
    #[must_use]
    pub fn tile_layout(&self) -> TileLayout {
        TileLayout::for_viewport(
            self.viewport.width,
            self.viewport.height,
            self.board.cols,
            self.board.margin,
            self.board.hit_tolerance,
        )
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 { Ok(()) } else { Err(invalid(field, format!("must be positive, got {value}"))) }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be zero or positive, got {value}")))
    }
}
