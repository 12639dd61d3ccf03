//! Rendering module
//!
//! `shapes` turns game state into a flat draw list without touching any
//! platform API; the canvas painter (wasm only) replays that list.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use shapes::{DrawCommand, RenderOptions, build_frame};
