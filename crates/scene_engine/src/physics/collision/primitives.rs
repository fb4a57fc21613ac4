//! Primitive collision geometry and intersection algorithms
//!
//! Provides the world-space axis-aligned rectangle used by the rectangle
//! collision shape, with its overlap test and minimum translation vector.

use crate::foundation::math::{vec2, Vec2};

/// An axis-aligned rectangle in world space
///
/// `position` is the top-left corner; `width` grows along +x and `height`
/// along +y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner in world space
    pub position: Vec2,
    /// Extent along x
    pub width: f32,
    /// Extent along y
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and extents
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self { position, width, height }
    }

    /// Smallest x covered by the rectangle
    #[inline]
    pub fn left(&self) -> f32 {
        self.position.x
    }

    /// Largest x covered by the rectangle
    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.width
    }

    /// Smallest y covered by the rectangle
    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y
    }

    /// Largest y covered by the rectangle
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.height
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Vec2 {
        self.position + vec2(self.width, self.height) * 0.5
    }

    /// Checks if a point lies inside the rectangle (edges included)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left() && point.x <= self.right()
            && point.y >= self.top() && point.y <= self.bottom()
    }

    /// Check if this rectangle overlaps another
    ///
    /// Rectangles that only touch along an edge count as overlapping.
    pub fn intersects(&self, other: &Rect) -> bool {
        let separated = self.left() > other.right()
            || self.right() < other.left()
            || self.top() > other.bottom()
            || self.bottom() < other.top();
        !separated
    }

    /// Smallest single-axis displacement that pushes `self` out of `other`
    ///
    /// The axis with the smaller penetration wins; on a tie the y axis is
    /// used. The sign follows the shorter of the two directional depths on
    /// that axis. Callers must check [`intersects`](Rect::intersects) first:
    /// for separated rectangles the result is computed from the raw deltas
    /// and carries no meaning.
    pub fn minimum_translation_vector(&self, other: &Rect) -> Vec2 {
        let dx1 = self.right() - other.left();
        let dx2 = other.right() - self.left();
        let dy1 = self.bottom() - other.top();
        let dy2 = other.bottom() - self.top();

        let dx = dx1.min(dx2);
        let dy = dy1.min(dy2);

        if dx < dy {
            vec2(if dx1 < dx2 { -dx } else { dx }, 0.0)
        } else {
            vec2(0.0, if dy1 < dy2 { -dy } else { dy })
        }
    }
}
