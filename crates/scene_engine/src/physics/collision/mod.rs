//! Collision geometry
//!
//! Shapes are stored relative to the body that owns them and transformed to
//! world space only while a test runs, so moving a node never requires
//! touching its shape.
//!
//! - [`primitives`] - World-space geometric primitives ([`Rect`])
//! - [`shape`] - Body-relative [`CollisionShape`] and its [`WorldSpaceShape`]

pub mod primitives;
pub mod shape;

pub use primitives::Rect;
pub use shape::{CollisionShape, ShapeKind, WorldSpaceShape};
