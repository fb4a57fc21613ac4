//! # Rendering boundary
//!
//! The engine core never draws anything itself. Behaviors receive a
//! [`Canvas`] trait object in their `render` hook and issue commands against
//! it; the host decides what a canvas actually is (a window surface, a
//! command buffer, nothing at all).
//!
//! ## Design Philosophy
//!
//! The canvas is a passive sink that:
//! - Accepts world-space geometry (no transform logic)
//! - Only handles drawing (no lifecycle, input, or timing)

mod canvas;
mod commands;

pub use canvas::{Canvas, NullCanvas, RecordingCanvas};
pub use commands::{Color, DrawCommand};
