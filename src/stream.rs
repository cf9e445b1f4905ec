//! Stream playback: shows one dream at a time and walks the sequence with an
//! animated transition.
//!
//! ```text
//!   Idle ──(len > 0)──▶ Showing(i) ──(dwell elapsed & playing, or next)──▶ Transitioning(i → i+1)
//!     ▲                     ▲                                                    │
//!     └──(len == 0)─────────┴──────────────────(progress == 1)───────────────────┘
//! ```
//!
//! The player does not own the sequence. Every call takes the current
//! effective length, so the host can change the archive or the board's
//! sequence between ticks. Length changes are applied while idle or showing;
//! during a transition the target index is kept and re-clamped when the
//! transition settles.
//!
//! Only [`StreamPlayer::tick`] reads the clock. A dwell or transition begun
//! between ticks has no start time until the next tick latches one, so a host
//! that was not ticking still sees the full dwell and the whole animation.

#[cfg(test)]
#[path = "stream_test.rs"]
mod stream_test;

use serde::{Deserialize, Serialize};

use crate::archive::{DreamArchive, DreamId};
use crate::consts::{STREAM_DWELL_MS, STREAM_SWAP_PROGRESS, STREAM_TRANSITION_MS};

/// Playback timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Time each dream stays on screen before auto-advancing.
    pub dwell_ms: f64,
    /// Length of the transition animation.
    pub transition_ms: f64,
    /// Whether playback starts enabled.
    pub autoplay: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { dwell_ms: STREAM_DWELL_MS, transition_ms: STREAM_TRANSITION_MS, autoplay: true }
    }
}

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackState {
    /// Nothing to show.
    Idle,
    /// Holding on one dream. `since_ms` is `None` until the next tick.
    Showing { index: usize, since_ms: Option<f64> },
    /// Animating from `from` to `to`; the displayed dream swaps once `swapped`.
    Transitioning { from: usize, to: usize, started_ms: Option<f64>, progress: f64, swapped: bool },
}

/// What the stream view should draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamFrame {
    /// Displayed position in the effective sequence.
    pub index: usize,
    /// Effective sequence length.
    pub len: usize,
    /// Transition progress, while a transition runs.
    pub transition: Option<f64>,
}

/// Notable playback steps, for the host and for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// Playback began showing `index` after being idle.
    Started { index: usize },
    /// A transition from `from` to `to` began.
    TransitionStarted { from: usize, to: usize },
    /// The displayed dream changed to `index` at the transition midpoint.
    Swapped { index: usize },
    /// The transition finished on `index`.
    Settled { index: usize },
    /// The sequence emptied and playback went idle.
    Stopped,
}

/// The ids playback walks: the board sequence if non-empty, else archive order.
#[must_use]
pub fn effective_sequence(sequence: &[DreamId], archive: &DreamArchive) -> Vec<DreamId> {
    if sequence.is_empty() {
        archive.ids()
    } else {
        sequence.to_vec()
    }
}

/// The playback state machine.
#[derive(Debug, Clone)]
pub struct StreamPlayer {
    config: StreamConfig,
    state: PlaybackState,
    playing: bool,
}

impl Default for StreamPlayer {
    fn default() -> Self {
        Self::new(StreamConfig::default())
    }
}

impl StreamPlayer {
    #[must_use]
    pub fn new(config: StreamConfig) -> Self {
        Self { config, state: PlaybackState::Idle, playing: config.autoplay }
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Flip play/pause. Only the dwell timer is gated; `next` always works.
    ///
    /// Resuming restarts the dwell on the dream currently shown.
    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        if self.playing
            && let PlaybackState::Showing { index, .. } = self.state
        {
            self.state = PlaybackState::Showing { index, since_ms: None };
        }
        self.playing
    }

    /// Index currently on screen, if any.
    #[must_use]
    pub fn displayed_index(&self) -> Option<usize> {
        match self.state {
            PlaybackState::Idle => None,
            PlaybackState::Showing { index, .. } => Some(index),
            PlaybackState::Transitioning { from, to, swapped, .. } => Some(if swapped { to } else { from }),
        }
    }

    #[must_use]
    pub fn frame(&self, len: usize) -> Option<StreamFrame> {
        let index = self.displayed_index()?;
        let transition = match self.state {
            PlaybackState::Transitioning { progress, .. } => Some(progress),
            _ => None,
        };
        Some(StreamFrame { index, len, transition })
    }

    /// Drop back to idle, abandoning any transition.
    pub fn reset(&mut self) {
        self.state = PlaybackState::Idle;
    }

    /// Reconcile with the current sequence length.
    ///
    /// Idle starts showing the first dream once there is one; showing goes
    /// idle when the sequence empties and clamps its index when it shrinks.
    /// Transitions are left alone.
    pub fn sync(&mut self, len: usize) -> Option<StreamEvent> {
        match self.state {
            PlaybackState::Idle if len > 0 => {
                self.state = PlaybackState::Showing { index: 0, since_ms: None };
                Some(StreamEvent::Started { index: 0 })
            }
            PlaybackState::Showing { .. } if len == 0 => {
                self.state = PlaybackState::Idle;
                Some(StreamEvent::Stopped)
            }
            PlaybackState::Showing { index, since_ms } if index >= len => {
                self.state = PlaybackState::Showing { index: index % len, since_ms };
                None
            }
            _ => None,
        }
    }

    /// Manually advance. Ignored while idle or already transitioning.
    pub fn next(&mut self, len: usize) -> Option<StreamEvent> {
        self.sync(len);
        let PlaybackState::Showing { index, .. } = self.state else {
            return None;
        };
        Some(self.begin_transition(index, len, None))
    }

    fn begin_transition(&mut self, from: usize, len: usize, started_ms: Option<f64>) -> StreamEvent {
        let to = (from + 1) % len.max(1);
        tracing::debug!(from, to, "stream transition started");
        self.state = PlaybackState::Transitioning { from, to, started_ms, progress: 0.0, swapped: false };
        StreamEvent::TransitionStarted { from, to }
    }

    /// Advance timers to `now_ms`.
    pub fn tick(&mut self, len: usize, now_ms: f64) -> Vec<StreamEvent> {
        let mut events: Vec<StreamEvent> = self.sync(len).into_iter().collect();

        match self.state {
            PlaybackState::Idle => {}
            PlaybackState::Showing { index, since_ms } => {
                let since_ms = since_ms.unwrap_or(now_ms);
                self.state = PlaybackState::Showing { index, since_ms: Some(since_ms) };
                if self.playing && now_ms - since_ms >= self.config.dwell_ms {
                    events.push(self.begin_transition(index, len, Some(now_ms)));
                }
            }
            PlaybackState::Transitioning { from, to, started_ms, progress, swapped } => {
                let started_ms = started_ms.unwrap_or(now_ms);
                let raw = if self.config.transition_ms > 0.0 {
                    (now_ms - started_ms) / self.config.transition_ms
                } else {
                    1.0
                };
                let progress = progress.max(raw.clamp(0.0, 1.0));

                let mut swapped = swapped;
                if !swapped && progress >= STREAM_SWAP_PROGRESS {
                    swapped = true;
                    events.push(StreamEvent::Swapped { index: to });
                }

                if progress >= 1.0 {
                    self.state = PlaybackState::Showing { index: to, since_ms: Some(now_ms) };
                    events.push(StreamEvent::Settled { index: to });
                    events.extend(self.sync(len));
                } else {
                    self.state =
                        PlaybackState::Transitioning { from, to, started_ms: Some(started_ms), progress, swapped };
                }
            }
        }
        events
    }
}
