//! Debug visualization
//!
//! Overlays drawn after the scene, straight onto the frame's canvas.

pub mod collision_debug;

pub use collision_debug::{CollisionDebugColors, CollisionDebugDraw};
