//! Physics module for collision detection and response
//!
//! Bodies are scene nodes carrying a [`CollisionBody`]. Once per frame the
//! [`CollisionSystem`] tests every pair of bodies reachable from the active
//! root and lets each side of an overlapping pair respond according to its
//! [`BodyKind`].

pub mod body;
pub mod collision;
pub mod collision_layers;
pub mod collision_system;

pub use body::{collision_response, BodyKind, CollisionBody, CollisionResponse};
pub use collision::{CollisionShape, Rect, ShapeKind, WorldSpaceShape};
pub use collision_layers::{CollisionLayers, LayerMask};
pub use collision_system::{CollisionPair, CollisionStats, CollisionSystem};

use thiserror::Error;

/// Physics errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// Layer channels are numbered 1 through 5
    #[error("Collision layer {0} is out of range (expected 1..=5)")]
    LayerOutOfRange(u8),
}
