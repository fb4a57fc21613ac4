//! Math utilities and types
//!
//! The engine works in 2D screen-style coordinates: x grows to the right and
//! y grows downwards, so a rectangle's "top" is its smallest y.

pub use nalgebra::Vector2;

/// 2D vector type
///
/// Value semantics: every operation returns a new vector. `nalgebra` provides
/// the arithmetic (`+`, `-`, `* scalar`) as well as `magnitude`, `normalize`,
/// `dot`, `angle` and `metric_distance`.
pub type Vec2 = Vector2<f32>;

/// Shorthand constructor for [`Vec2`]
#[inline]
pub fn vec2(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}
