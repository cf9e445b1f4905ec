//! The dream archive: every sketch captured this session, in capture order.
//!
//! The archive is append-only. A dream's strokes and overlays never change
//! after capture; only its board placement moves when the user drags it.
//! The list sits behind an `Arc` so the board and stream can hold a snapshot
//! while the archive grows or a placement changes.

#[cfg(test)]
#[path = "archive_test.rs"]
mod archive_test;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::board::TileLayout;
use crate::camera::Point;
use crate::overlay::Overlay;
use crate::stroke::Stroke;

/// Unique identifier for a dream.
pub type DreamId = Uuid;

/// One archived capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Dream {
    pub id: DreamId,
    pub strokes: Arc<Vec<Stroke>>,
    pub overlays: Arc<Vec<Overlay>>,
    /// Milliseconds since the Unix epoch at capture.
    pub created_ms: i64,
    /// Top-left corner of the dream's tile on the board.
    pub placement: Point,
}

/// Append-only collection of dreams.
#[derive(Debug, Clone, Default)]
pub struct DreamArchive {
    dreams: Arc<Vec<Dream>>,
}

impl DreamArchive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dreams(&self) -> &[Dream] {
        &self.dreams
    }

    /// Shared handle to the current dream list.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Dream>> {
        Arc::clone(&self.dreams)
    }

    #[must_use]
    pub fn get(&self, id: &DreamId) -> Option<&Dream> {
        self.dreams.iter().find(|d| &d.id == id)
    }

    /// Dream ids in capture order.
    #[must_use]
    pub fn ids(&self) -> Vec<DreamId> {
        self.dreams.iter().map(|d| d.id).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dreams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dreams.is_empty()
    }

    /// Archive a capture, placing it in the next grid slot.
    ///
    /// Returns `None` without archiving when there is nothing to capture.
    pub fn append(
        &mut self,
        strokes: Arc<Vec<Stroke>>,
        overlays: Arc<Vec<Overlay>>,
        created_ms: i64,
        layout: &TileLayout,
    ) -> Option<DreamId> {
        if strokes.is_empty() && overlays.is_empty() {
            return None;
        }
        let dream = Dream {
            id: Uuid::new_v4(),
            strokes,
            overlays,
            created_ms,
            placement: layout.grid_position(self.dreams.len()),
        };
        let id = dream.id;
        tracing::info!(
            dream_id = %id,
            strokes = dream.strokes.len(),
            overlays = dream.overlays.len(),
            "dream captured"
        );
        Arc::make_mut(&mut self.dreams).push(dream);
        Some(id)
    }

    /// Move a dream's tile. Returns false if the id is unknown.
    pub fn reposition(&mut self, id: &DreamId, placement: Point) -> bool {
        let Some(idx) = self.dreams.iter().position(|d| &d.id == id) else {
            return false;
        };
        if let Some(dream) = Arc::make_mut(&mut self.dreams).get_mut(idx) {
            dream.placement = placement;
        }
        true
    }
}

/// Wall-clock milliseconds since the Unix epoch, or 0 if the clock is unset.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}
