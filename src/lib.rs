//! Sketch capture, dream board, and stream playback engine.
//!
//! The crate owns every piece of state behind the sketching surface: the
//! strokes and frame overlays on the canvas, the loop-closure gesture that
//! consolidates a sketch into an archived dream, the spatial board where
//! dreams are arranged and connected with a freehand pen, and the stream that
//! plays the connected sequence back. The host is responsible only for wiring
//! pointer events and a frame clock into [`engine::EngineCore`] and drawing
//! the [`render::DrawCommand`]s it hands back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Owning coordinator [`engine::EngineCore`] and its [`engine::Action`]s |
//! | [`config`] | Engine configuration and validation |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`geom`] | Pure geometry helpers |
//! | [`stroke`] | Strokes, ink palette, and the canvas [`stroke::Sketch`] |
//! | [`overlay`] | Frame overlay shapes and lens filters |
//! | [`capture`] | In-progress stroke tracking and loop-closure detection |
//! | [`spiral`] | Spiral consolidation animation |
//! | [`archive`] | Append-only dream archive |
//! | [`hit`] | Hit-testing overlays and board tiles |
//! | [`board`] | Connectivity pen and stream-sequence derivation |
//! | [`stream`] | Playback state machine |
//! | [`glimpse`] | Camera-backed overlay collaborator |
//! | [`input`] | View modes and the draw-view gesture state |
//! | [`render`] | Draw-command descriptions for all views |
//! | [`consts`] | Shared numeric constants (thresholds, durations, layout) |

pub mod archive;
pub mod board;
pub mod camera;
pub mod capture;
pub mod config;
pub mod consts;
pub mod engine;
pub mod geom;
pub mod glimpse;
pub mod hit;
pub mod input;
pub mod overlay;
pub mod render;
pub mod spiral;
pub mod stream;
pub mod stroke;
